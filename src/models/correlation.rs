use serde_json::{json, Value};

/// Where the member is in the class-then-membership flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStage {
    NoActiveBooking,
    ClassBooked,
    MembershipPending,
}

/// Identifiers handed from the class-booking step to the membership step,
/// the equivalent of router navigation state.
#[derive(Clone, Debug, PartialEq)]
pub struct NavState {
    pub class_booking_id: i64,
    pub class_reference: String,
}

/// The persisted correlation between a class booking and the membership
/// purchase that follows it. Survives restarts via the session store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrelationState {
    pub class_booking_id: Option<i64>,
    pub class_reference: Option<String>,
    pub membership_booking_id: Option<i64>,
    pub package_id: Option<String>,
    pub payment_method: Option<String>,
}

impl CorrelationState {
    /// The reference shown to the member. Always the class booking's
    /// reference, never the membership's own.
    pub fn display_reference(&self) -> Option<&str> {
        self.class_reference.as_deref()
    }

    pub fn has_class_booking(&self) -> bool {
        self.class_booking_id.is_some() || self.class_reference.is_some()
    }

    pub fn stage(&self) -> FlowStage {
        if self.membership_booking_id.is_some() {
            FlowStage::MembershipPending
        } else if self.has_class_booking() {
            FlowStage::ClassBooked
        } else {
            FlowStage::NoActiveBooking
        }
    }

    /// Decode a stored blob. Tolerates the older field names
    /// (`bookingId`, `referenceNumber`) still present in long-lived
    /// sessions, and ids written as either numbers or strings.
    pub fn from_json(raw: &Value) -> Self {
        Self {
            class_booking_id: read_id(raw, &["classBookingId", "bookingId"]),
            class_reference: read_str(raw, &["classReference", "referenceNumber"]),
            membership_booking_id: read_id(raw, &["membershipBookingId"]),
            package_id: read_str(raw, &["packageId"]),
            payment_method: read_str(raw, &["paymentMethod"]),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        if let Some(id) = self.class_booking_id {
            obj.insert("classBookingId".into(), json!(id));
        }
        if let Some(ref r) = self.class_reference {
            obj.insert("classReference".into(), json!(r));
        }
        if let Some(id) = self.membership_booking_id {
            obj.insert("membershipBookingId".into(), json!(id));
        }
        if let Some(ref p) = self.package_id {
            obj.insert("packageId".into(), json!(p));
        }
        if let Some(ref m) = self.payment_method {
            obj.insert("paymentMethod".into(), json!(m));
        }
        Value::Object(obj)
    }
}

fn read_id(raw: &Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        match raw.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(id) = n.as_i64() {
                    return Some(id);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(id) = s.trim().parse::<i64>() {
                    return Some(id);
                }
            }
            _ => {}
        }
    }
    None
}

fn read_str(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = raw.get(*key).and_then(Value::as_str) {
            if !s.trim().is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let state = CorrelationState {
            class_booking_id: Some(42),
            class_reference: Some("SR-0042".into()),
            membership_booking_id: Some(77),
            package_id: Some("5-sessions".into()),
            payment_method: Some("wave".into()),
        };
        assert_eq!(CorrelationState::from_json(&state.to_json()), state);
    }

    #[test]
    fn test_legacy_field_names() {
        let raw = serde_json::json!({
            "bookingId": "42",
            "referenceNumber": "SR-0042"
        });
        let state = CorrelationState::from_json(&raw);
        assert_eq!(state.class_booking_id, Some(42));
        assert_eq!(state.class_reference.as_deref(), Some("SR-0042"));
    }

    #[test]
    fn test_current_names_win_over_legacy() {
        let raw = serde_json::json!({
            "classBookingId": 7,
            "bookingId": 42,
            "classReference": "SR-0007",
            "referenceNumber": "SR-0042"
        });
        let state = CorrelationState::from_json(&raw);
        assert_eq!(state.class_booking_id, Some(7));
        assert_eq!(state.class_reference.as_deref(), Some("SR-0007"));
    }

    #[test]
    fn test_blank_reference_ignored() {
        let raw = serde_json::json!({ "classReference": "  ", "referenceNumber": "SR-0009" });
        let state = CorrelationState::from_json(&raw);
        assert_eq!(state.class_reference.as_deref(), Some("SR-0009"));
    }

    #[test]
    fn test_stage_progression() {
        let mut state = CorrelationState::default();
        assert_eq!(state.stage(), FlowStage::NoActiveBooking);

        state.class_booking_id = Some(1);
        state.class_reference = Some("SR-0001".into());
        assert_eq!(state.stage(), FlowStage::ClassBooked);

        state.membership_booking_id = Some(2);
        assert_eq!(state.stage(), FlowStage::MembershipPending);
    }

    #[test]
    fn test_display_reference_is_class_reference() {
        let state = CorrelationState {
            class_booking_id: Some(1),
            class_reference: Some("SR-0001".into()),
            membership_booking_id: Some(2),
            ..Default::default()
        };
        assert_eq!(state.display_reference(), Some("SR-0001"));
    }
}
