use chrono::Utc;
use serde_json::Value;

use crate::models::{BookingRecord, BookingStatus, BookingType};
use crate::services::datetime::{self, parse_instant};

const DATE_KEYS: &[&str] = &["booking_date", "date", "start_date", "scheduled_date", "created_at"];
const TIME_KEYS: &[&str] = &["booking_time", "time", "start_time", "scheduled_time"];

/// Turn one raw backend booking payload into a canonical record. Total:
/// missing or malformed fields degrade to sentinels, never an error.
pub fn normalize_booking(raw: &Value) -> BookingRecord {
    let package_type = pick_str(raw, &["package_type"]);

    let booking_type = match pick_str(raw, &["booking_type", "type"]) {
        Some(t) => BookingType::parse(&t),
        // the original records memberships by package alone
        None if package_type.is_some() => BookingType::Membership,
        None => BookingType::Class,
    };

    let status = BookingStatus::parse(&pick_str(raw, &["status"]).unwrap_or_default());

    let reference_number = pick_str(raw, &["reference_number", "reference"]);

    let id = raw
        .get("id")
        .map(|v| match v {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => String::new(),
        })
        .filter(|s| !s.is_empty())
        .or_else(|| reference_number.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let name = pick_str(raw, &["class_name"])
        .or_else(|| package_type.as_deref().map(title_case_package))
        .or_else(|| pick_str(raw, &["title", "name"]))
        .unwrap_or_else(|| "Class".to_string());

    let date = pick_str(raw, DATE_KEYS);
    let time = pick_str(raw, TIME_KEYS);
    let formatted = datetime::format_date_time(date.as_deref(), time.as_deref());

    let amount = raw
        .get("amount")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .max(0.0);

    let created_at = pick_str(raw, &["created_at"])
        .and_then(|s| parse_instant(&s, None))
        .or(formatted.instant)
        .unwrap_or_else(|| Utc::now().naive_utc());

    BookingRecord {
        id,
        name,
        booking_type,
        status,
        package_type,
        package_sessions: raw.get("package_sessions").and_then(Value::as_i64),
        payment_method: pick_str(raw, &["payment_method"]),
        instructor: pick_str(raw, &["instructor"]),
        difficulty: pick_str(raw, &["difficulty"]),
        reference_number,
        date_display: formatted.date,
        time_display: formatted.time,
        scheduled_at: formatted.instant,
        amount,
        created_at,
    }
}

pub fn normalize_bookings(raw: &[Value]) -> Vec<BookingRecord> {
    raw.iter().map(normalize_booking).collect()
}

/// First non-empty string value among the given keys.
fn pick_str(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = raw.get(*key).and_then(Value::as_str) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// `"5-sessions"` -> `"5 Sessions"`.
fn title_case_package(package: &str) -> String {
    package
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
