//! Request dispatch: size guard → parse → validate → execute → envelope.
//!
//! The rate check runs earlier, as middleware, because it only needs headers.
//! Execution is bounded by the request budget; a request that runs past it
//! ends with the 500 envelope and its primality scan is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;

use crate::ai::AnswerProvider;
use crate::api::envelope::{Payload, ResponseEnvelope};
use crate::api::error::{ApiError, ApiResult};
use crate::api::operation::ValidatedRequest;
use crate::api::validator::validate;
use crate::math;
use crate::observability::metrics;
use crate::security::check_body_size;

/// Label recorded for requests rejected before an operation was chosen.
const UNRESOLVED_OPERATION: &str = "none";

/// Sequences processing of one operations request.
#[derive(Clone)]
pub struct Dispatcher {
    official_email: Arc<str>,
    max_body_bytes: usize,
    /// Upper bound on executing one validated request.
    request_timeout: Duration,
    ai: Arc<dyn AnswerProvider>,
}

impl Dispatcher {
    pub fn new(
        official_email: Arc<str>,
        max_body_bytes: usize,
        request_timeout: Duration,
        ai: Arc<dyn AnswerProvider>,
    ) -> Self {
        Self {
            official_email,
            max_body_bytes,
            request_timeout,
            ai,
        }
    }

    pub fn official_email(&self) -> &str {
        &self.official_email
    }

    /// Process a raw body into its terminal envelope.
    pub async fn handle(&self, body: &[u8]) -> ResponseEnvelope {
        let start = Instant::now();

        let (operation, result) = match self.prepare(body) {
            Ok(request) => {
                let operation = request.operation().key();
                (operation, self.execute(request).await)
            }
            Err(e) => (UNRESOLVED_OPERATION, Err(e)),
        };

        let envelope = ResponseEnvelope::from_result(&self.official_email, result);
        metrics::record_request(operation, envelope.status().as_u16(), start);
        envelope
    }

    /// Size check, JSON parse and validation. No computation happens here.
    pub fn prepare(&self, body: &[u8]) -> ApiResult<ValidatedRequest> {
        check_body_size(body, self.max_body_bytes)?;

        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Rejected unparseable body");
            ApiError::malformed("Invalid JSON in request body")
        })?;

        validate(&value).inspect_err(|e| {
            tracing::debug!(status = e.status().as_u16(), error = %e, "Rejected request");
        })
    }

    /// Run a validated request within the request budget.
    pub async fn execute(&self, request: ValidatedRequest) -> ApiResult<Payload> {
        let operation = request.operation();
        let cancelled = Arc::new(AtomicBool::new(false));

        match timeout(self.request_timeout, self.run(request, cancelled.clone())).await {
            Ok(result) => result,
            Err(_) => {
                // the blocking task sees this on its next poll and exits
                cancelled.store(true, Ordering::Relaxed);
                tracing::error!(
                    operation = %operation,
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "Request exceeded its time budget"
                );
                Err(ApiError::Internal)
            }
        }
    }

    /// Questions go to the delegate; math runs on the blocking pool.
    async fn run(&self, request: ValidatedRequest, cancelled: Arc<AtomicBool>) -> ApiResult<Payload> {
        if let ValidatedRequest::Ai(question) = &request {
            return self.ask(question).await;
        }

        tokio::task::spawn_blocking(move || compute(request, &cancelled))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Computation task failed");
                ApiError::Internal
            })?
    }

    async fn ask(&self, question: &str) -> ApiResult<Payload> {
        match self.ai.answer(question).await {
            Ok(answer) => Ok(Payload::Text(answer)),
            Err(e) => {
                tracing::error!(error = %e, "AI delegate failed");
                Err(ApiError::UpstreamUnavailable)
            }
        }
    }
}

/// Evaluate a math request synchronously, stopping early once `cancelled` is set.
pub fn compute(request: ValidatedRequest, cancelled: &AtomicBool) -> ApiResult<Payload> {
    match request {
        ValidatedRequest::Fibonacci(n) => Ok(math::fibonacci(n).into()),
        ValidatedRequest::Prime(numbers) => math::filter_primes_until(&numbers, cancelled)
            .map(Payload::from)
            .map_err(|e| {
                tracing::debug!(error = %e, "Primality scan stopped");
                ApiError::Internal
            }),
        ValidatedRequest::Hcf(numbers) => Ok(math::hcf(&numbers).into()),
        ValidatedRequest::Lcm(numbers) => math::lcm(&numbers)
            .map(Payload::from)
            .map_err(|e| ApiError::argument(e.to_string())),
        // the dispatcher routes questions to the delegate before computing
        ValidatedRequest::Ai(_) => Err(ApiError::Internal),
    }
}
