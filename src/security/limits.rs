//! Request body size ceiling.
//!
//! # Responsibilities
//! - Reject raw bodies above the configured byte limit (413)
//!
//! # Design Decisions
//! - Checked on raw bytes, before JSON parsing
//! - Bodies beyond the transport limit never reach this check; the HTTP
//!   layer maps that rejection to the same 413

use crate::api::ApiError;

/// Default ceiling: 10 KiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024;

/// Reject bodies strictly larger than `max_bytes`.
pub fn check_body_size(body: &[u8], max_bytes: usize) -> Result<(), ApiError> {
    if body.len() > max_bytes {
        tracing::warn!(size = body.len(), limit = max_bytes, "Request body too large");
        return Err(ApiError::BodyTooLarge);
    }
    Ok(())
}
