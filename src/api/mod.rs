//! Operations API: validation, dispatch and the response envelope.
//!
//! # Data Flow
//! ```text
//! raw body bytes
//!     → security (rate + size guard)
//!     → serde_json::Value
//!     → validator.rs (exactly one recognized key, typed argument)
//!     → dispatch.rs (math on the blocking pool, or the AI delegate)
//!     → envelope.rs (success / failure body with official_email)
//! ```
//!
//! # Design Decisions
//! - Every rejection is an `ApiError` whose Display is the client message
//! - Validation is pure and runs before any computation
//! - Internal fault details are logged, never returned

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod validator;

pub use dispatch::Dispatcher;
pub use envelope::{Payload, ResponseEnvelope};
pub use error::{ApiError, ApiResult};
pub use operation::{Operation, ValidatedRequest};
pub use validator::validate;
