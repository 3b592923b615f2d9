//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bfhl_service::ai::{AiError, AiResult, AnswerProvider};
use bfhl_service::{HttpServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

pub const OFFICIAL_EMAIL: &str = "tester@example.com";

/// Config with a known identity; everything else default.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.identity.official_email = OFFICIAL_EMAIL.to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}

/// Scripted AI delegate: answers with a fixed word, or fails, counting calls.
pub struct ScriptedAnswer {
    answer: Option<&'static str>,
    calls: AtomicUsize,
}

impl ScriptedAnswer {
    pub fn answering(word: &'static str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(word),
            calls: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerProvider for ScriptedAnswer {
    async fn answer(&self, _question: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Some(word) => Ok(word.to_string()),
            None => Err(AiError::Status(503)),
        }
    }
}

/// Start the real server on an ephemeral port.
pub async fn start_server(config: ServiceConfig, ai: Arc<dyn AnswerProvider>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::with_answer_provider(config, ai);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
