//! Route handlers. Every response except the bare OPTIONS reply uses the envelope.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
};

use crate::api::{ApiError, ResponseEnvelope};
use crate::http::server::AppState;

/// `POST /api/bfhl`.
pub async fn operations(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ResponseEnvelope {
    match body {
        Ok(bytes) => state.dispatcher.handle(&bytes).await,
        Err(rejection) => {
            // bodies past the transport cap surface here rather than in the size guard
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::BodyTooLarge
            } else {
                ApiError::MalformedInput("Invalid request body".to_string())
            };
            tracing::warn!(rejection = %rejection, "Failed to read request body");
            ResponseEnvelope::failure(state.dispatcher.official_email(), &error)
        }
    }
}

/// `GET /api/health`.
pub async fn health(State(state): State<AppState>) -> ResponseEnvelope {
    ResponseEnvelope::success(state.dispatcher.official_email(), "healthy".to_string())
}

/// `OPTIONS` on either route: an empty 200. Preflights carrying
/// `Access-Control-Request-Method` are answered by the CORS layer first.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method a route does not serve.
pub async fn method_not_allowed(State(state): State<AppState>) -> ResponseEnvelope {
    ResponseEnvelope::failure(state.dispatcher.official_email(), &ApiError::MethodNotAllowed)
}
