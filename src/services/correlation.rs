use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use rusqlite::Connection;
use serde_json::Value;

use crate::db::queries::{self, CORRELATION_KEY};
use crate::models::{CorrelationState, NavState};

/// Persists the class-to-membership correlation in the session store and
/// resolves it with the navigation payload taking priority.
pub struct CorrelationTracker {
    db: Arc<Mutex<Connection>>,
}

impl CorrelationTracker {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// Resolve the current state: the navigation payload wins when present,
    /// otherwise whatever the store holds, otherwise empty.
    pub fn load(&self, nav: Option<&NavState>) -> anyhow::Result<CorrelationState> {
        let stored = self.load_stored()?;

        if let Some(nav) = nav {
            let mut state = stored.unwrap_or_default();
            state.class_booking_id = Some(nav.class_booking_id);
            state.class_reference = Some(nav.class_reference.clone());
            self.save(&state)?;
            return Ok(state);
        }

        Ok(stored.unwrap_or_default())
    }

    fn load_stored(&self) -> anyhow::Result<Option<CorrelationState>> {
        let conn = self.lock()?;
        let raw = match queries::get_value(&conn, CORRELATION_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(Some(CorrelationState::from_json(&value))),
            Err(e) => {
                // a corrupt blob reads as empty rather than wedging the flow
                tracing::warn!(error = %e, "discarding unreadable correlation blob");
                Ok(None)
            }
        }
    }

    /// Persist a fresh class booking and hand back the navigation payload
    /// for the membership step.
    pub fn record_class_booking(
        &self,
        booking_id: i64,
        reference: &str,
    ) -> anyhow::Result<NavState> {
        let state = CorrelationState {
            class_booking_id: Some(booking_id),
            class_reference: Some(reference.to_string()),
            ..Default::default()
        };
        self.save(&state)?;
        tracing::info!(booking_id, reference, "class booking recorded");
        Ok(NavState {
            class_booking_id: booking_id,
            class_reference: reference.to_string(),
        })
    }

    /// Store the membership booking id. Returns `true` when the backend
    /// assigned a reference that differs from the class reference; the
    /// displayed reference stays the class one either way.
    pub fn record_membership_booking(
        &self,
        state: &mut CorrelationState,
        membership_booking_id: i64,
        server_reference: Option<&str>,
    ) -> anyhow::Result<bool> {
        state.membership_booking_id = Some(membership_booking_id);
        self.save(state)?;

        let mismatch = match (state.class_reference.as_deref(), server_reference) {
            (Some(ours), Some(theirs)) if ours != theirs => {
                tracing::warn!(
                    class_reference = ours,
                    server_reference = theirs,
                    "backend assigned a different reference to the membership booking"
                );
                true
            }
            _ => false,
        };
        Ok(mismatch)
    }

    pub fn save(&self, state: &CorrelationState) -> anyhow::Result<()> {
        let conn = self.lock()?;
        queries::set_value(&conn, CORRELATION_KEY, &state.to_json().to_string())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        queries::delete_value(&conn, CORRELATION_KEY)?;
        Ok(())
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn tracker() -> CorrelationTracker {
        let conn = db::init_db(":memory:").unwrap();
        CorrelationTracker::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_empty_store_loads_default() {
        let t = tracker();
        let state = t.load(None).unwrap();
        assert_eq!(state, CorrelationState::default());
        assert!(!state.has_class_booking());
    }

    #[test]
    fn test_roundtrip_through_store_alone() {
        let t = tracker();
        t.record_class_booking(42, "SR-0001").unwrap();

        let state = t.load(None).unwrap();
        assert_eq!(state.class_booking_id, Some(42));
        assert_eq!(state.display_reference(), Some("SR-0001"));
    }

    #[test]
    fn test_nav_payload_wins_over_store() {
        let t = tracker();
        t.record_class_booking(1, "SR-0001").unwrap();

        let nav = NavState {
            class_booking_id: 2,
            class_reference: "SR-0002".to_string(),
        };
        let state = t.load(Some(&nav)).unwrap();
        assert_eq!(state.class_booking_id, Some(2));
        assert_eq!(state.display_reference(), Some("SR-0002"));

        // and the nav payload was persisted
        let reloaded = t.load(None).unwrap();
        assert_eq!(reloaded.class_booking_id, Some(2));
    }

    #[test]
    fn test_legacy_blob_recovered() {
        let t = tracker();
        {
            let conn = t.db.lock().unwrap();
            queries::set_value(
                &conn,
                CORRELATION_KEY,
                r#"{"bookingId":"7","referenceNumber":"SR-0007"}"#,
            )
            .unwrap();
        }
        let state = t.load(None).unwrap();
        assert_eq!(state.class_booking_id, Some(7));
        assert_eq!(state.display_reference(), Some("SR-0007"));
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty() {
        let t = tracker();
        {
            let conn = t.db.lock().unwrap();
            queries::set_value(&conn, CORRELATION_KEY, "not json").unwrap();
        }
        assert_eq!(t.load(None).unwrap(), CorrelationState::default());
    }

    #[test]
    fn test_membership_reference_mismatch_is_soft() {
        let t = tracker();
        t.record_class_booking(1, "SR-0001").unwrap();
        let mut state = t.load(None).unwrap();

        let mismatch = t
            .record_membership_booking(&mut state, 9, Some("SR-0099"))
            .unwrap();
        assert!(mismatch);
        assert_eq!(state.display_reference(), Some("SR-0001"));
        assert_eq!(state.membership_booking_id, Some(9));
    }

    #[test]
    fn test_matching_reference_no_mismatch() {
        let t = tracker();
        t.record_class_booking(1, "SR-0001").unwrap();
        let mut state = t.load(None).unwrap();
        assert!(!t
            .record_membership_booking(&mut state, 9, Some("SR-0001"))
            .unwrap());
    }

    #[test]
    fn test_clear_wipes_store() {
        let t = tracker();
        t.record_class_booking(1, "SR-0001").unwrap();
        t.clear().unwrap();
        assert_eq!(t.load(None).unwrap(), CorrelationState::default());
    }
}
