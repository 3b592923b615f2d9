//! Per-client fixed-window rate limiting.
//!
//! Each client identity owns one entry `(count, reset_at)`. A request after
//! `reset_at` starts a fresh window with count 1; otherwise the count is
//! incremented and the request is rejected once it exceeds the ceiling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time;

use crate::api::{ApiError, ResponseEnvelope};
use crate::config::LimitsConfig;
use crate::observability::metrics;

/// Bucket shared by every client without forwarding headers.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Counter state for one client identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

impl RateLimitEntry {
    fn fresh(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_at
    }
}

/// Shared store of rate-limit entries keyed by client identity.
///
/// Read-increment-compare runs under the DashMap shard lock for the key, so
/// two concurrent requests from one client cannot both observe the same count.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &LimitsConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Record a request from `key` and report whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                reset_at: now + self.window,
            });

        if entry.is_expired(now) {
            *entry = RateLimitEntry::fresh(now, self.window);
            return true;
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= self.max_requests
    }

    /// Remove entries whose window has elapsed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Current entry for `key`, if tracked.
    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|r| *r.value())
    }

    /// Number of tracked client identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive the client identity from forwarding headers.
///
/// First entry of `x-forwarded-for`, else `x-real-ip`, else the shared
/// `"unknown"` bucket. Both headers are client-controlled and spoofable.
pub fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        return forwarded.split(',').next().unwrap_or_default().trim().to_string();
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    UNKNOWN_CLIENT.to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// State for the rate-limit middleware.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    pub official_email: Arc<str>,
}

/// Middleware rejecting clients over their window ceiling with a 429 envelope.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(request.headers());

    if state.limiter.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        metrics::record_rate_limited();
        ResponseEnvelope::failure(&state.official_email, &ApiError::RateLimited).into_response()
    }
}

/// Background task evicting expired entries to bound memory.
pub struct RateLimitSweeper {
    limiter: Arc<RateLimiter>,
    interval: Duration,
}

impl RateLimitSweeper {
    pub fn new(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        Self { limiter, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Rate limit sweeper starting");

        let mut ticker = time::interval(self.interval);
        // the first tick fires immediately; nothing to sweep yet
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.limiter.sweep();
                    let remaining = self.limiter.len();
                    metrics::record_rate_limit_entries(remaining);
                    if removed > 0 {
                        tracing::debug!(removed, remaining, "Swept expired rate limit entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Rate limit sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
