//! AI delegate: single-word answers to free-form questions.
//!
//! # Responsibilities
//! - Define the `AnswerProvider` seam used by the dispatcher
//! - Provide the Gemini-backed production client
//! - Provide a disabled provider for deployments without a key
//!
//! # Design Decisions
//! - No retries; one upstream round trip per request
//! - Every failure collapses to `ApiError::UpstreamUnavailable` at the edge

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Errors that can occur while asking the delegate.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key, or the delegate is switched off.
    #[error("AI delegate not configured: {0}")]
    NotConfigured(String),

    /// Network failure or timeout.
    #[error("AI transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("AI upstream returned status {0}")]
    Status(u16),

    /// Upstream body did not carry an answer.
    #[error("invalid response structure from AI upstream: {0}")]
    MalformedResponse(String),
}

/// Result type for delegate calls.
pub type AiResult<T> = Result<T, AiError>;

/// Something that can answer a question with a single word.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, question: &str) -> AiResult<String>;
}

/// Provider used when the delegate is disabled in configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

#[async_trait]
impl AnswerProvider for DisabledProvider {
    async fn answer(&self, _question: &str) -> AiResult<String> {
        Err(AiError::NotConfigured("AI delegate disabled".to_string()))
    }
}
