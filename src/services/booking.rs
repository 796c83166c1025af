use crate::api::{ClassBookingRequest, StudioApi};
use crate::errors::{ApiError, FlowError};
use crate::models::NavState;
use crate::services::correlation::CorrelationTracker;

/// Result of booking a class: the identifiers the membership step needs.
#[derive(Clone, Debug)]
pub struct ClassBookingOutcome {
    pub booking_id: i64,
    pub reference_number: String,
    pub nav: NavState,
}

/// Book a class and persist the correlation. The backend must assign a
/// reference number; without one the membership flow cannot proceed.
pub async fn book_class(
    api: &dyn StudioApi,
    tracker: &CorrelationTracker,
    req: &ClassBookingRequest,
) -> Result<ClassBookingOutcome, FlowError> {
    let created = api.create_class_booking(req).await?;

    let reference = created
        .reference_number
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| {
            FlowError::Api(ApiError::Decode(
                "booking created without a reference number".to_string(),
            ))
        })?;

    let nav = tracker.record_class_booking(created.booking_id, &reference)?;
    tracing::info!(
        booking_id = created.booking_id,
        reference = %reference,
        class_id = req.class_id,
        "class booked"
    );

    Ok(ClassBookingOutcome {
        booking_id: created.booking_id,
        reference_number: reference,
        nav,
    })
}
