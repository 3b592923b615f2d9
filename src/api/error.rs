//! Error taxonomy for the operations endpoint.

use axum::http::StatusCode;
use thiserror::Error;

/// Every way a request can fail. `Display` is the message sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Body absent, unparseable, or not an object.
    #[error("{0}")]
    MalformedInput(String),

    /// Zero or several recognized operation keys.
    #[error("{0}")]
    InvalidSelection(String),

    /// Argument of the wrong type or out of range.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Too many requests, slow down")]
    RateLimited,

    /// The AI delegate failed; the cause is logged, not returned.
    #[error("AI service unavailable")]
    UpstreamUnavailable,

    /// Unanticipated fault; the cause is logged, not returned.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status associated with this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput(_)
            | ApiError::InvalidSelection(_)
            | ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedInput(message.into())
    }

    pub(crate) fn selection(message: impl Into<String>) -> Self {
        ApiError::InvalidSelection(message.into())
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }
}

/// Result type for operations endpoint processing.
pub type ApiResult<T> = Result<T, ApiError>;
