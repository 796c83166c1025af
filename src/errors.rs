/// Failure of a single backend request. `Server` carries the `message` field
/// of the error payload when the backend supplied one.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Server(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message shown to the user: the server's own message when present,
    /// otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server(msg) if !msg.is_empty() => msg.clone(),
            _ => "API request failed".to_string(),
        }
    }
}

/// Errors of the booking/membership flow. Validation variants are raised
/// before any request is sent; `Api` wraps a failed request.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("No class booking found. Please book a class first, then return to choose a package.")]
    ClassBookingRequired,

    #[error("Select a package before choosing a payment method.")]
    NoPackageSelected,

    #[error("A booking request is already being processed.")]
    RequestInFlight,

    #[error("Select a payment method and complete the booking before this step.")]
    PaymentNotReady,

    #[error("unknown package: {0}")]
    UnknownPackage(String),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for FlowError {
    fn from(e: anyhow::Error) -> Self {
        FlowError::Storage(e.to_string())
    }
}
