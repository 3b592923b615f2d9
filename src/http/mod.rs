//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware stack)
//!     → request.rs (request ID assigned and echoed)
//!     → security::rate_limit (per-client window, operations route only)
//!     → handlers.rs (body read → Dispatcher → envelope)
//!     → Send to client
//! ```

pub mod cors;
pub mod handlers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
