//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request on the operations endpoint:
//!     → rate_limit.rs (per-client sliding window, headers only)
//!     → limits.rs (raw body byte ceiling, before JSON parsing)
//!     → Pass to validation
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any guard failure
//! - Guards never look at request content beyond size
//! - Rate-limit state is process local (see DESIGN.md scaling note)

pub mod limits;
pub mod rate_limit;

pub use limits::check_body_size;
pub use rate_limit::{client_key, RateLimiter, RateLimitSweeper};
