//! Ollama native chat client (`/api/chat`, non-streaming)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Generator, GeneratorError};
use super::{build_http_client, post_json};
use crate::prompts::{ChatMessage, plan_messages};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "llama2";

#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

impl OllamaGenerator {
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeneratorError> {
        // Accept either the server root or the full chat path
        let url = if endpoint.ends_with("/api/chat") {
            endpoint.to_string()
        } else {
            format!("{}/api/chat", endpoint.trim_end_matches('/'))
        };
        Ok(Self {
            client: build_http_client(timeout)?,
            url,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        main_industry: &str,
        sub_industry: &str,
    ) -> Result<String, GeneratorError> {
        let messages = plan_messages(main_industry, sub_industry);
        let body = OllamaChatRequest {
            model: &self.model,
            messages: &messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };
        debug!("Ollama chat request (model={}, url={})", self.model, self.url);

        let resp = post_json(&self.client, &self.url, None, &body, self.timeout_ms).await?;
        let parsed: OllamaChatResponse = resp
            .json()
            .await
            .map_err(|e| GeneratorError::ParseError(format!("Ollama response: {}", e)))?;

        let content = parsed
            .message
            .map(|m| m.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(GeneratorError::EmptyCompletion);
        }
        Ok(content)
    }
}
