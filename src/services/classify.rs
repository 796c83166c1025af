use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::models::{BookingRecord, BookingStatus};

/// The portal's views over one set of bookings. Input records are cloned,
/// never mutated; a record can appear in more than one view.
#[derive(Clone, Debug, Default)]
pub struct ClassifiedBookings {
    pub upcoming: Vec<BookingRecord>,
    pub past: Vec<BookingRecord>,
    pub all: Vec<BookingRecord>,
    pub active_memberships: Vec<BookingRecord>,
    pub pending_approval: Vec<BookingRecord>,
}

pub fn classify(now: NaiveDateTime, records: &[BookingRecord]) -> ClassifiedBookings {
    let mut upcoming: Vec<BookingRecord> = records
        .iter()
        .filter(|r| r.status.counts_as_upcoming())
        .filter(|r| matches!(r.scheduled_at, Some(at) if at > now))
        .cloned()
        .collect();
    upcoming.sort_by_key(|r| r.scheduled_at);

    // dated history newest-first, then undated completed/cancelled records
    // by creation; other undated records stay out of this view
    let mut past: Vec<BookingRecord> = records
        .iter()
        .filter(|r| match r.scheduled_at {
            Some(at) => at <= now || r.status.counts_as_past(),
            None => r.status.counts_as_past(),
        })
        .cloned()
        .collect();
    past.sort_by(|a, b| match (a.scheduled_at, b.scheduled_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    });

    let mut all: Vec<BookingRecord> = records.to_vec();
    all.sort_by(|a, b| match (a.scheduled_at, b.scheduled_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    });

    let active_memberships: Vec<BookingRecord> = records
        .iter()
        .filter(|r| {
            r.is_membership()
                && matches!(r.status, BookingStatus::Active | BookingStatus::Confirmed)
        })
        .cloned()
        .collect();

    let pending_approval: Vec<BookingRecord> = records
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                BookingStatus::PaymentPending | BookingStatus::PendingAdminApproval
            )
        })
        .cloned()
        .collect();

    ClassifiedBookings {
        upcoming,
        past,
        all,
        active_memberships,
        pending_approval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingType;
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn record(
        id: &str,
        status: BookingStatus,
        scheduled_at: Option<NaiveDateTime>,
        created_at: NaiveDateTime,
    ) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            name: "Reform I".to_string(),
            booking_type: BookingType::Class,
            status,
            package_type: None,
            package_sessions: None,
            payment_method: None,
            instructor: None,
            difficulty: None,
            reference_number: None,
            date_display: "Date not set".to_string(),
            time_display: "Time not set".to_string(),
            scheduled_at,
            amount: 800.0,
            created_at,
        }
    }

    #[test]
    fn test_future_eligible_is_upcoming_ascending() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![
            record("b", BookingStatus::Confirmed, Some(dt("2026-03-20 07:00:00")), now),
            record("a", BookingStatus::Scheduled, Some(dt("2026-03-12 07:00:00")), now),
        ];
        let views = classify(now, &records);
        let ids: Vec<&str> = views.upcoming.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_cancelled_is_past_even_when_future_dated() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![record(
            "x",
            BookingStatus::Cancelled,
            Some(dt("2026-04-01 07:00:00")),
            now,
        )];
        let views = classify(now, &records);
        assert!(views.upcoming.is_empty());
        assert_eq!(views.past.len(), 1);
    }

    #[test]
    fn test_past_sorted_descending() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![
            record("old", BookingStatus::Completed, Some(dt("2026-01-05 07:00:00")), now),
            record("recent", BookingStatus::Completed, Some(dt("2026-03-01 07:00:00")), now),
        ];
        let views = classify(now, &records);
        let ids: Vec<&str> = views.past.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["recent", "old"]);
    }

    #[test]
    fn test_undated_pending_only_in_all() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![record("u", BookingStatus::Pending, None, now)];
        let views = classify(now, &records);
        assert!(views.upcoming.is_empty());
        assert!(views.past.is_empty());
        assert_eq!(views.all.len(), 1);
    }

    #[test]
    fn test_undated_rejected_and_expired_only_in_all() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![
            record("r", BookingStatus::Rejected, None, now),
            record("e", BookingStatus::Expired, None, now),
        ];
        let views = classify(now, &records);
        assert!(views.upcoming.is_empty());
        assert!(views.past.is_empty());
        assert_eq!(views.all.len(), 2);
    }

    #[test]
    fn test_future_dated_rejected_not_past() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![record(
            "r",
            BookingStatus::Rejected,
            Some(dt("2026-04-01 07:00:00")),
            now,
        )];
        let views = classify(now, &records);
        assert!(views.upcoming.is_empty());
        assert!(views.past.is_empty());
        assert_eq!(views.all.len(), 1);
    }

    #[test]
    fn test_undated_cancelled_appended_to_past_by_created_at() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![
            record("dated", BookingStatus::Completed, Some(dt("2026-02-01 07:00:00")), dt("2026-01-01 00:00:00")),
            record("undated-old", BookingStatus::Cancelled, None, dt("2026-01-02 00:00:00")),
            record("undated-new", BookingStatus::Cancelled, None, dt("2026-02-02 00:00:00")),
        ];
        let views = classify(now, &records);
        let ids: Vec<&str> = views.past.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["dated", "undated-new", "undated-old"]);
    }

    #[test]
    fn test_all_keeps_every_record() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![
            record("a", BookingStatus::Pending, None, dt("2026-01-01 00:00:00")),
            record("b", BookingStatus::Confirmed, Some(dt("2026-03-20 07:00:00")), now),
            record("c", BookingStatus::Completed, Some(dt("2026-01-01 07:00:00")), now),
        ];
        let views = classify(now, &records);
        assert_eq!(views.all.len(), 3);
        // dated before undated, dated descending
        let ids: Vec<&str> = views.all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_membership_views() {
        let now = dt("2026-03-10 12:00:00");
        let mut active = record("m1", BookingStatus::Active, None, now);
        active.booking_type = BookingType::Membership;
        active.package_type = Some("5-sessions".to_string());
        let mut waiting = record("m2", BookingStatus::PendingAdminApproval, None, now);
        waiting.booking_type = BookingType::Membership;

        let views = classify(now, &[active, waiting]);
        assert_eq!(views.active_memberships.len(), 1);
        assert_eq!(views.active_memberships[0].id, "m1");
        assert_eq!(views.pending_approval.len(), 1);
        assert_eq!(views.pending_approval[0].id, "m2");
    }

    #[test]
    fn test_input_not_reordered() {
        let now = dt("2026-03-10 12:00:00");
        let records = vec![
            record("first", BookingStatus::Completed, Some(dt("2026-01-05 07:00:00")), now),
            record("second", BookingStatus::Completed, Some(dt("2026-03-01 07:00:00")), now),
        ];
        let _ = classify(now, &records);
        assert_eq!(records[0].id, "first");
    }
}
