use chrono::NaiveDateTime;

/// Lifecycle of a booking as reported by the backend. Unrecognized values
/// parse to `Pending` so a new backend status never breaks classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    PendingAdminApproval,
    PaymentPending,
    Confirmed,
    Scheduled,
    Active,
    Completed,
    Cancelled,
    Rejected,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::PendingAdminApproval => "pending_admin_approval",
            BookingStatus::PaymentPending => "payment_pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending_admin_approval" => BookingStatus::PendingAdminApproval,
            "payment_pending" => BookingStatus::PaymentPending,
            "confirmed" => BookingStatus::Confirmed,
            "scheduled" => BookingStatus::Scheduled,
            "active" => BookingStatus::Active,
            "completed" => BookingStatus::Completed,
            "cancelled" | "canceled" => BookingStatus::Cancelled,
            "rejected" => BookingStatus::Rejected,
            "expired" => BookingStatus::Expired,
            _ => BookingStatus::Pending,
        }
    }

    /// Statuses that belong in the past view regardless of date. Rejected
    /// and expired bookings are not history in this sense; they stay out of
    /// upcoming too and show only in the unfiltered view when undated.
    pub fn counts_as_past(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Statuses eligible for the upcoming view. Approval-wait statuses are
    /// deliberately absent: those bookings show under the pending view.
    pub fn counts_as_upcoming(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending
                | BookingStatus::Confirmed
                | BookingStatus::Scheduled
                | BookingStatus::Active
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingType {
    Class,
    Membership,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Class => "class",
            BookingType::Membership => "membership",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "membership" => BookingType::Membership,
            _ => BookingType::Class,
        }
    }
}

/// One booking after normalization. Every field is populated; the raw
/// backend payload may have omitted any of them.
#[derive(Clone, Debug)]
pub struct BookingRecord {
    pub id: String,
    pub name: String,
    pub booking_type: BookingType,
    pub status: BookingStatus,
    pub package_type: Option<String>,
    pub package_sessions: Option<i64>,
    pub payment_method: Option<String>,
    pub instructor: Option<String>,
    pub difficulty: Option<String>,
    pub reference_number: Option<String>,
    /// Formatted display date, or the "not set" sentinel.
    pub date_display: String,
    /// Formatted display time, or the "not set" sentinel.
    pub time_display: String,
    /// Parsed scheduling instant when the raw date was parseable.
    pub scheduled_at: Option<NaiveDateTime>,
    pub amount: f64,
    pub created_at: NaiveDateTime,
}

impl BookingRecord {
    pub fn is_membership(&self) -> bool {
        self.booking_type == BookingType::Membership || self.package_type.is_some()
    }
}
