//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, overlay the environment, and validate.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Defaults overlaid with the environment, validated.
pub fn load_default() -> Result<ServiceConfig, ConfigError> {
    finalize(ServiceConfig::default())
}

fn finalize(mut config: ServiceConfig) -> Result<ServiceConfig, ConfigError> {
    config.apply_env();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

impl ServiceConfig {
    /// Overlay `OFFICIAL_EMAIL`, `GEMINI_API_KEY` and `BFHL_BIND_ADDRESS`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(email) = lookup("OFFICIAL_EMAIL") {
            self.identity.official_email = email;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.ai.api_key = key;
        }
        if let Some(addr) = lookup("BFHL_BIND_ADDRESS") {
            self.listener.bind_address = addr;
        }
    }
}
