//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (CORS, request ID, trace, panic capture)
//! - Apply the rate limiter to `POST /api/bfhl` only; 405 and OPTIONS
//!   responses never touch a client's budget
//! - Run the rate-limit sweeper alongside the server
//! - Bind server to listener with graceful shutdown

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::ai::{AiError, AnswerProvider, DisabledProvider, GeminiClient};
use crate::api::{ApiError, Dispatcher, ResponseEnvelope};
use crate::config::ServiceConfig;
use crate::http::cors::cors_layer;
use crate::http::handlers;
use crate::http::request::MakeRequestUuidV4;
use crate::lifecycle::shutdown;
use crate::security::rate_limit::{rate_limit_middleware, RateLimitState};
use crate::security::{RateLimitSweeper, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP server for the operations API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a server using the AI delegate described by the configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, AiError> {
        let ai: Arc<dyn AnswerProvider> = if config.ai.enabled {
            if config.ai.api_key.is_empty() {
                tracing::warn!("AI delegate enabled without an API key; AI requests will fail with 502");
            }
            Arc::new(GeminiClient::new(&config.ai)?)
        } else {
            tracing::info!("AI delegate disabled");
            Arc::new(DisabledProvider)
        };

        Ok(Self::with_answer_provider(config, ai))
    }

    /// Create a server with an explicit AI delegate.
    pub fn with_answer_provider(config: ServiceConfig, ai: Arc<dyn AnswerProvider>) -> Self {
        let official_email: Arc<str> = Arc::from(config.identity.official_email.as_str());
        let limiter = Arc::new(RateLimiter::from_config(&config.limits));

        let state = AppState {
            dispatcher: Dispatcher::new(
                official_email.clone(),
                config.limits.max_body_bytes,
                Duration::from_secs(config.timeouts.request_secs),
                ai,
            ),
        };
        let rate_state = RateLimitState {
            limiter: limiter.clone(),
            official_email,
        };

        let router = Self::build_router(&config, state, rate_state);
        Self {
            router,
            config,
            limiter,
        }
    }

    /// Build the axum router with all middleware layers.
    ///
    /// The execution budget lives in the dispatcher so that a slow request
    /// still ends with an envelope.
    fn build_router(config: &ServiceConfig, state: AppState, rate_state: RateLimitState) -> Router {
        // route_layer on the method router wraps only the methods registered before it
        let operations = post(handlers::operations)
            .route_layer(middleware::from_fn_with_state(rate_state, rate_limit_middleware))
            .options(handlers::preflight)
            .fallback(handlers::method_not_allowed);

        let health = get(handlers::health)
            .options(handlers::preflight)
            .fallback(handlers::method_not_allowed);

        Router::new()
            .route("/api/bfhl", operations)
            .route("/api/health", health)
            .with_state(state.clone())
            .layer(DefaultBodyLimit::max(config.limits.transport_limit_bytes))
            .layer(CatchPanicLayer::custom(panic_responder(state)))
            .layer(cors_layer())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared rate limiter.
    pub fn limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = RateLimitSweeper::new(
            self.limiter.clone(),
            Duration::from_secs(self.config.limits.sweep_interval_secs),
        );
        tokio::spawn(sweeper.run(shutdown_rx.resubscribe()));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Turn a handler panic into a 500 envelope; the panic message is only logged.
fn panic_responder(state: AppState) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone {
    move |panic| {
        let detail = panic
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| panic.downcast_ref::<&str>().copied())
            .unwrap_or("non-string panic payload");
        tracing::error!(panic = %detail, "Unhandled fault while serving request");
        ResponseEnvelope::failure(state.dispatcher.official_email(), &ApiError::Internal).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiResult;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl AnswerProvider for Echo {
        async fn answer(&self, question: &str) -> AiResult<String> {
            Ok(question.split_whitespace().last().unwrap_or_default().to_string())
        }
    }

    struct Panicking;

    #[async_trait]
    impl AnswerProvider for Panicking {
        async fn answer(&self, _question: &str) -> AiResult<String> {
            panic!("secret detail");
        }
    }

    fn test_config() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.identity.official_email = "me@example.com".into();
        config.limits.max_requests = 3;
        config
    }

    fn server(ai: Arc<dyn AnswerProvider>) -> HttpServer {
        HttpServer::with_answer_provider(test_config(), ai)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str, client: &str) -> Request<Body> {
        Request::post("/api/bfhl")
            .header("content-type", "application/json")
            .header("x-forwarded-for", client)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fibonacci_over_http() {
        let router = server(Arc::new(Echo)).router();
        let (status, body) = send(&router, post_json(r#"{"fibonacci": 7}"#, "1.1.1.1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"is_success": true, "official_email": "me@example.com", "data": [0, 1, 1, 2, 3, 5, 8]})
        );
    }

    #[tokio::test]
    async fn test_ai_over_http() {
        let router = server(Arc::new(Echo)).router();
        let (status, body) = send(&router, post_json(r#"{"AI": "  say Paris "}"#, "1.1.1.1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "Paris");
    }

    #[tokio::test]
    async fn test_rate_limit_per_client() {
        let router = server(Arc::new(Echo)).router();

        for _ in 0..3 {
            let (status, _) = send(&router, post_json(r#"{"hcf": [4, 6]}"#, "9.9.9.9")).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = send(&router, post_json(r#"{"hcf": [4, 6]}"#, "9.9.9.9")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Too many requests, slow down");
        assert_eq!(body["official_email"], "me@example.com");

        let (status, _) = send(&router, post_json(r#"{"hcf": [4, 6]}"#, "8.8.8.8")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_precedes_size_check() {
        let mut config = test_config();
        config.limits.max_requests = 1;
        let router = HttpServer::with_answer_provider(config, Arc::new(Echo)).router();
        let oversized = format!(r#"{{"AI": "{}"}}"#, "x".repeat(20 * 1024));

        let (status, _) = send(&router, post_json(&oversized, "7.7.7.7")).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let (status, _) = send(&router, post_json(&oversized, "7.7.7.7")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_body_over_transport_limit_gets_envelope() {
        let router = server(Arc::new(Echo)).router();
        let huge = "x".repeat(2 * 1024 * 1024);
        let (status, body) = send(&router, post_json(&huge, "6.6.6.6")).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Request body too large");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let router = server(Arc::new(Echo)).router();

        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let request = Request::builder()
                .method(method)
                .uri("/api/bfhl")
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(&router, request).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", method);
            assert_eq!(body["error"], "Method not allowed");
            assert_eq!(body["is_success"], false);
        }

        let request = Request::post("/api/health").body(Body::empty()).unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_rejected_methods_leave_post_budget_intact() {
        let mut config = test_config();
        config.limits.max_requests = 2;
        let router = HttpServer::with_answer_provider(config, Arc::new(Echo)).router();

        for method in ["GET", "GET", "PUT", "OPTIONS", "OPTIONS"] {
            let request = Request::builder()
                .method(method)
                .uri("/api/bfhl")
                .header("x-forwarded-for", "1.2.3.4")
                .body(Body::empty())
                .unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS, "{}", method);
        }

        for _ in 0..2 {
            let (status, _) = send(&router, post_json(r#"{"fibonacci": 3}"#, "1.2.3.4")).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, _) = send(&router, post_json(r#"{"fibonacci": 3}"#, "1.2.3.4")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_options_answers_ok_with_empty_body() {
        let router = server(Arc::new(Echo)).router();

        for uri in ["/api/bfhl", "/api/health"] {
            let request = Request::builder()
                .method("OPTIONS")
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(bytes.is_empty(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_slow_prime_request_ends_in_envelope() {
        let mut config = test_config();
        config.timeouts.request_secs = 1;
        let router = HttpServer::with_answer_provider(config, Arc::new(Echo)).router();
        let primes = vec!["18446744073709551557"; 20].join(",");
        let body = format!(r#"{{"prime": [{}]}}"#, primes);

        let (status, body) = send(&router, post_json(&body, "4.4.4.4")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "is_success": false,
                "official_email": "me@example.com",
                "error": "Internal server error"
            })
        );
    }

    #[tokio::test]
    async fn test_health() {
        let router = server(Arc::new(Echo)).router();
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"is_success": true, "official_email": "me@example.com", "data": "healthy"})
        );
    }

    #[tokio::test]
    async fn test_panic_is_reported_generically() {
        let router = server(Arc::new(Panicking)).router();
        let (status, body) = send(&router, post_json(r#"{"AI": "anything"}"#, "5.5.5.5")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("secret detail"));
    }

    #[tokio::test]
    async fn test_request_id_and_cors_headers() {
        let router = server(Arc::new(Echo)).router();
        let request = Request::get("/api/health")
            .header("origin", "https://example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
