//! BFHL operations service.
//!
//! A single JSON endpoint (`POST /api/bfhl`) that accepts exactly one of
//! `fibonacci`, `prime`, `lcm`, `hcf` or `AI`, validates it, computes or
//! delegates the result, and answers with a uniform envelope.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http (cors, request id, trace, panic capture)
//!                │
//!                ▼
//!            security::rate_limit ──▶ 429   (POST only)
//!                │
//!                ▼
//!            api::Dispatcher
//!              ├─ security::limits ──▶ 413
//!              ├─ serde_json parse ──▶ 400
//!              ├─ api::validator ────▶ 400
//!              ├─ request budget ────▶ 500 when exceeded
//!              ├─ math (blocking pool, cancellable)
//!              └─ ai::AnswerProvider ─▶ 502 on failure
//!                │
//!                ▼
//!            api::ResponseEnvelope {is_success, official_email, data | error}
//! ```

// Core logic
pub mod api;
pub mod math;
pub mod security;

// Collaborators and surfaces
pub mod ai;
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
