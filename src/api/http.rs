use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use crate::errors::ApiError;

use super::{
    BookingCreated, ClassBookingRequest, ContactMessage, MembershipBookingRequest, StudioApi,
    StudioClass,
};

/// Reqwest-backed client for the studio backend. Attaches the bearer token
/// when the config carries one.
pub struct HttpStudioApi {
    base_url: String,
    auth_token: String,
    client: Client,
}

impl HttpStudioApi {
    pub fn new(base_url: &str, auth_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
            client: Client::new(),
        }
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        if self.auth_token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.auth_token)
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.authorize(self.client.get(&url)).send().await?;
        Self::decode(resp).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.authorize(self.client.delete(&url)).send().await?;
        Self::decode(resp).await
    }

    /// On a non-2xx response the backend's `message` field becomes the
    /// user-visible error, falling back to a generic string.
    async fn decode(resp: reqwest::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("API request failed")
                .to_string();
            return Err(ApiError::Server(message));
        }
        Ok(body)
    }

    fn as_array(body: Value, what: &str) -> Result<Vec<Value>, ApiError> {
        match body {
            Value::Array(items) => Ok(items),
            other => Err(ApiError::Decode(format!(
                "expected a JSON array of {what}, got {other}"
            ))),
        }
    }

    fn as_created(body: Value) -> Result<BookingCreated, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StudioApi for HttpStudioApi {
    async fn create_class_booking(
        &self,
        req: &ClassBookingRequest,
    ) -> Result<BookingCreated, ApiError> {
        let body = json!({
            "booking_type": "class",
            "class_id": req.class_id,
            "booking_date": req.booking_date,
            "booking_time": req.booking_time,
            "amount": req.amount,
        });
        Self::as_created(self.post_json("/bookings", &body).await?)
    }

    async fn create_membership_booking(
        &self,
        req: &MembershipBookingRequest,
    ) -> Result<BookingCreated, ApiError> {
        let body = json!({
            "booking_type": "membership",
            "package_id": req.package_id,
            "amount": req.amount,
            "reference_number": req.reference_number,
            "class_booking_id": req.class_booking_id,
        });
        Self::as_created(self.post_json("/bookings", &body).await?)
    }

    async fn update_payment(
        &self,
        booking_id: i64,
        payment_method: &str,
    ) -> Result<(), ApiError> {
        let body = json!({ "payment_method": payment_method });
        self.post_json(&format!("/bookings/{booking_id}/payment"), &body)
            .await?;
        Ok(())
    }

    async fn list_bookings(&self) -> Result<Vec<Value>, ApiError> {
        Self::as_array(self.get_json("/bookings").await?, "bookings")
    }

    async fn list_classes(&self) -> Result<Vec<StudioClass>, ApiError> {
        let items = Self::as_array(self.get_json("/classes").await?, "classes")?;
        items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| ApiError::Decode(e.to_string())))
            .collect()
    }

    async fn submit_contact(&self, msg: &ContactMessage) -> Result<(), ApiError> {
        let body = serde_json::to_value(msg).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.post_json("/contact", &body).await?;
        Ok(())
    }

    async fn chatbot(&self, message: &str, session_id: &str) -> Result<String, ApiError> {
        let body = json!({ "message": message, "session_id": session_id });
        let resp = self.post_json("/chatbot", &body).await?;
        resp.get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode("chatbot response missing".to_string()))
    }

    async fn admin_members(&self) -> Result<Vec<Value>, ApiError> {
        Self::as_array(self.get_json("/admin/members").await?, "members")
    }

    async fn admin_bookings(&self) -> Result<Vec<Value>, ApiError> {
        Self::as_array(self.get_json("/admin/bookings").await?, "bookings")
    }

    async fn admin_update_booking_status(
        &self,
        booking_id: i64,
        status: &str,
    ) -> Result<(), ApiError> {
        let body = json!({ "status": status });
        self.post_json(&format!("/admin/bookings/{booking_id}/status"), &body)
            .await?;
        Ok(())
    }

    async fn admin_approve_membership(&self, booking_id: i64) -> Result<(), ApiError> {
        self.post_json(
            &format!("/admin/memberships/{booking_id}/approve"),
            &Value::Null,
        )
        .await?;
        Ok(())
    }

    async fn admin_reject_membership(&self, booking_id: i64) -> Result<(), ApiError> {
        self.post_json(
            &format!("/admin/memberships/{booking_id}/reject"),
            &Value::Null,
        )
        .await?;
        Ok(())
    }

    async fn admin_delete_class(&self, class_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/classes/{class_id}")).await?;
        Ok(())
    }
}
