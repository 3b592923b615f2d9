//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (OFFICIAL_EMAIL, GEMINI_API_KEY, BFHL_BIND_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_default, ConfigError};
pub use schema::{
    AiConfig, IdentityConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ServiceConfig,
    TimeoutConfig,
};
