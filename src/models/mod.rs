pub mod booking;
pub mod correlation;
pub mod package;

pub use booking::{BookingRecord, BookingStatus, BookingType};
pub use correlation::{CorrelationState, FlowStage, NavState};
pub use package::{MembershipPackage, PaymentMethod};
