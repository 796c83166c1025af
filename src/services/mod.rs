pub mod booking;
pub mod classify;
pub mod correlation;
pub mod datetime;
pub mod membership;
pub mod normalize;
