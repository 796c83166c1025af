use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_NOT_SET: &str = "Date not set";
pub const TIME_NOT_SET: &str = "Time not set";

const DISPLAY_DATE: &str = "%a, %b %d, %Y";

/// Display strings plus the parsed instant when one could be recovered.
#[derive(Clone, Debug, PartialEq)]
pub struct FormattedDateTime {
    pub date: String,
    pub time: String,
    pub instant: Option<NaiveDateTime>,
}

/// Format a raw date/time pair for display. Total: absent fields become
/// sentinels, unparseable ones pass through unchanged with no instant.
pub fn format_date_time(date: Option<&str>, time: Option<&str>) -> FormattedDateTime {
    let raw_date = date.map(str::trim).filter(|s| !s.is_empty());
    let raw_time = time.map(str::trim).filter(|s| !s.is_empty());

    let time_display = match raw_time {
        Some(t) => to_12_hour(t),
        None => TIME_NOT_SET.to_string(),
    };

    let raw_date = match raw_date {
        Some(d) => d,
        None => {
            return FormattedDateTime {
                date: DATE_NOT_SET.to_string(),
                time: time_display,
                instant: None,
            }
        }
    };

    match parse_instant(raw_date, raw_time) {
        Some(instant) => FormattedDateTime {
            date: instant.format(DISPLAY_DATE).to_string(),
            time: time_display,
            instant: Some(instant),
        },
        None => FormattedDateTime {
            date: raw_date.to_string(),
            time: time_display,
            instant: None,
        },
    }
}

/// Parse a backend date string, trying full-datetime shapes first and
/// falling back to date-only combined with the separate time field.
pub fn parse_instant(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let trimmed = date.trim().trim_end_matches('Z');

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    let day = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
    let at = time
        .and_then(parse_time)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default());
    Some(day.and_time(at))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    for fmt in ["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M%p"] {
        if let Ok(t) = NaiveTime::parse_from_str(trimmed, fmt) {
            return Some(t);
        }
    }
    None
}

/// Render an `HH:MM` time as 12-hour with AM/PM. Anything that does not
/// parse as a time passes through unchanged.
pub fn to_12_hour(raw: &str) -> String {
    match parse_time(raw) {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_date_and_time() {
        let f = format_date_time(None, None);
        assert_eq!(f.date, DATE_NOT_SET);
        assert_eq!(f.time, TIME_NOT_SET);
        assert_eq!(f.instant, None);
    }

    #[test]
    fn test_empty_strings_are_sentinels() {
        let f = format_date_time(Some("  "), Some(""));
        assert_eq!(f.date, DATE_NOT_SET);
        assert_eq!(f.time, TIME_NOT_SET);
    }

    #[test]
    fn test_date_only_with_time_field() {
        let f = format_date_time(Some("2026-03-14"), Some("07:00"));
        assert_eq!(f.date, "Sat, Mar 14, 2026");
        assert_eq!(f.time, "7:00 AM");
        assert_eq!(
            f.instant,
            Some(
                NaiveDate::from_ymd_opt(2026, 3, 14)
                    .unwrap()
                    .and_hms_opt(7, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_full_datetime_string() {
        let f = format_date_time(Some("2026-03-14T18:30:00"), Some("18:30"));
        assert_eq!(f.date, "Sat, Mar 14, 2026");
        assert_eq!(f.time, "6:30 PM");
        assert_eq!(f.instant.unwrap().format("%H:%M").to_string(), "18:30");
    }

    #[test]
    fn test_iso_with_fraction_and_zulu() {
        let f = format_date_time(Some("2026-03-14T07:00:00.000Z"), None);
        assert!(f.instant.is_some());
        assert_eq!(f.date, "Sat, Mar 14, 2026");
    }

    #[test]
    fn test_garbage_date_passes_through() {
        let f = format_date_time(Some("next tuesday"), Some("07:00"));
        assert_eq!(f.date, "next tuesday");
        assert_eq!(f.time, "7:00 AM");
        assert_eq!(f.instant, None);
    }

    #[test]
    fn test_garbage_time_passes_through() {
        let f = format_date_time(Some("2026-03-14"), Some("early morning"));
        assert_eq!(f.time, "early morning");
        // the unparseable time falls back to midnight for the instant
        assert_eq!(f.instant.unwrap().format("%H:%M").to_string(), "00:00");
    }

    #[test]
    fn test_date_missing_but_time_present() {
        let f = format_date_time(None, Some("18:00"));
        assert_eq!(f.date, DATE_NOT_SET);
        assert_eq!(f.time, "6:00 PM");
        assert_eq!(f.instant, None);
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(to_12_hour("00:00"), "12:00 AM");
        assert_eq!(to_12_hour("12:00"), "12:00 PM");
    }
}
