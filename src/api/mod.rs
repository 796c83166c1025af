pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ApiError;

pub use http::HttpStudioApi;

/// Request body for a class booking.
#[derive(Clone, Debug, Serialize)]
pub struct ClassBookingRequest {
    pub class_id: i64,
    pub booking_date: String,
    pub booking_time: String,
    pub amount: f64,
}

/// Request body for a membership booking. Carries the class booking's id
/// and reference so the backend can correlate the two.
#[derive(Clone, Debug, Serialize)]
pub struct MembershipBookingRequest {
    pub package_id: String,
    pub amount: f64,
    pub reference_number: String,
    pub class_booking_id: i64,
}

/// What the backend returns for a newly created booking.
#[derive(Clone, Debug, Deserialize)]
pub struct BookingCreated {
    pub booking_id: i64,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StudioClass {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// The studio backend. One implementation talks HTTP; tests substitute
/// their own.
#[async_trait]
pub trait StudioApi: Send + Sync {
    async fn create_class_booking(
        &self,
        req: &ClassBookingRequest,
    ) -> Result<BookingCreated, ApiError>;

    async fn create_membership_booking(
        &self,
        req: &MembershipBookingRequest,
    ) -> Result<BookingCreated, ApiError>;

    async fn update_payment(&self, booking_id: i64, payment_method: &str)
        -> Result<(), ApiError>;

    /// Raw booking payloads; shapes vary by backend version, so the
    /// normalizer owns the interpretation.
    async fn list_bookings(&self) -> Result<Vec<Value>, ApiError>;

    async fn list_classes(&self) -> Result<Vec<StudioClass>, ApiError>;

    async fn submit_contact(&self, msg: &ContactMessage) -> Result<(), ApiError>;

    async fn chatbot(&self, message: &str, session_id: &str) -> Result<String, ApiError>;

    async fn admin_members(&self) -> Result<Vec<Value>, ApiError>;

    async fn admin_bookings(&self) -> Result<Vec<Value>, ApiError>;

    async fn admin_update_booking_status(
        &self,
        booking_id: i64,
        status: &str,
    ) -> Result<(), ApiError>;

    async fn admin_approve_membership(&self, booking_id: i64) -> Result<(), ApiError>;

    async fn admin_reject_membership(&self, booking_id: i64) -> Result<(), ApiError>;

    async fn admin_delete_class(&self, class_id: i64) -> Result<(), ApiError>;
}
