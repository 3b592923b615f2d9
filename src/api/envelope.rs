//! Uniform response envelope.
//!
//! ```text
//! success: {"is_success": true,  "official_email": "...", "data": [..] | n | "..."}
//! failure: {"is_success": false, "official_email": "...", "error": "..."}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::error::ApiError;

/// Data carried by a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Numbers(Vec<u128>),
    Number(u128),
    Text(String),
}

impl From<Vec<u64>> for Payload {
    fn from(numbers: Vec<u64>) -> Self {
        Payload::Numbers(numbers.into_iter().map(u128::from).collect())
    }
}

impl From<Vec<u128>> for Payload {
    fn from(numbers: Vec<u128>) -> Self {
        Payload::Numbers(numbers)
    }
}

impl From<u64> for Payload {
    fn from(n: u64) -> Self {
        Payload::Number(n as u128)
    }
}

impl From<u128> for Payload {
    fn from(n: u128) -> Self {
        Payload::Number(n)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessBody {
    is_success: bool,
    pub official_email: String,
    pub data: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureBody {
    is_success: bool,
    pub official_email: String,
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

/// Terminal response for a request: success or failure, always with the
/// configured official email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success(SuccessBody),
    Failure(FailureBody),
}

impl ResponseEnvelope {
    pub fn success(official_email: &str, data: impl Into<Payload>) -> Self {
        ResponseEnvelope::Success(SuccessBody {
            is_success: true,
            official_email: official_email.to_string(),
            data: data.into(),
        })
    }

    pub fn failure(official_email: &str, error: &ApiError) -> Self {
        ResponseEnvelope::Failure(FailureBody {
            is_success: false,
            official_email: official_email.to_string(),
            error: error.to_string(),
            status: error.status(),
        })
    }

    pub fn from_result(official_email: &str, result: Result<Payload, ApiError>) -> Self {
        match result {
            Ok(data) => Self::success(official_email, data),
            Err(e) => Self::failure(official_email, &e),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ResponseEnvelope::Success(_) => StatusCode::OK,
            ResponseEnvelope::Failure(body) => body.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success(_))
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
