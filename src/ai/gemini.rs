//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::ai::{AiError, AiResult, AnswerProvider};
use crate::config::AiConfig;

/// Delegate backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from configuration. The HTTP client carries the request timeout.
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[async_trait]
impl AnswerProvider for GeminiClient {
    async fn answer(&self, question: &str) -> AiResult<String> {
        if self.api_key.is_empty() {
            return Err(AiError::NotConfigured("GEMINI_API_KEY not configured".to_string()));
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(question) }] }]
        });

        let response = self.client.post(self.url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let raw = extract_answer(&payload)?;

        Ok(clean_answer(raw))
    }
}

/// Keep only letters, digits, spaces and `?,.'"-`.
pub fn sanitize_question(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '?' | ',' | '.' | '\'' | '"' | '-'))
        .collect()
}

/// Strip whitespace and punctuation so a single bare word remains.
pub fn clean_answer(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !c.is_whitespace()
                && !matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '(' | ')' | '-')
        })
        .collect()
}

fn build_prompt(question: &str) -> String {
    format!(
        "Answer the following question with exactly one word only. \
         No punctuation, no explanation, no extra text. Just one word.\n\nQuestion: {}",
        sanitize_question(question)
    )
}

/// Pull `candidates[0].content.parts[0].text` out of a generateContent response.
fn extract_answer(payload: &Value) -> AiResult<&str> {
    payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AiError::MalformedResponse("missing candidates[0].content.parts[0].text".to_string()))
}
