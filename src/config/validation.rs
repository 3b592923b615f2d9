//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows and limits > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let limits = &config.limits;
    if limits.window_secs == 0 {
        errors.push(ValidationError::new("limits.window_secs", "must be greater than 0"));
    }
    if limits.max_requests == 0 {
        errors.push(ValidationError::new("limits.max_requests", "must be greater than 0"));
    }
    if limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }
    if limits.transport_limit_bytes < limits.max_body_bytes {
        errors.push(ValidationError::new(
            "limits.transport_limit_bytes",
            "must be at least limits.max_body_bytes",
        ));
    }
    if limits.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("limits.sweep_interval_secs", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.ai.enabled {
        if let Err(e) = url::Url::parse(&config.ai.endpoint) {
            errors.push(ValidationError::new("ai.endpoint", format!("invalid URL: {}", e)));
        }
        if config.ai.model.trim().is_empty() {
            errors.push(ValidationError::new("ai.model", "must not be empty"));
        }
        if config.ai.timeout_secs == 0 {
            errors.push(ValidationError::new("ai.timeout_secs", "must be greater than 0"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
