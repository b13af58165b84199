//! Generator boundary: the language-model fallback used on catalog misses.
//!
//! ```text
//! Resolver --generate(main, sub)--> BoundedGenerator (timeout + retry)
//!                                        |
//!                                        v
//!                          OllamaGenerator | OpenAiGenerator
//!                                        |
//!                                   raw completion text
//! ```

pub mod bounded;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::{Config, Provider};
use crate::error::{PlanError, Result};

pub use bounded::{BoundedGenerator, RetryPolicy};
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use traits::{Generator, GeneratorError};

pub(crate) fn build_http_client(timeout: Duration) -> std::result::Result<Client, GeneratorError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GeneratorError::NotConfigured(format!("failed to build HTTP client: {}", e)))
}

/// POST a JSON body and return the response if the status is a success.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    body: &B,
    timeout_ms: u64,
) -> std::result::Result<reqwest::Response, GeneratorError> {
    let mut req = client.post(url).json(body);
    if let Some(key) = bearer {
        req = req.bearer_auth(key);
    }

    let resp = req.send().await.map_err(|e| {
        if e.is_timeout() {
            GeneratorError::Timeout { timeout_ms }
        } else {
            GeneratorError::Transport(e.to_string())
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(GeneratorError::Provider {
            status: status.as_u16(),
            body: truncate_snippet(text.trim(), 500),
        });
    }
    Ok(resp)
}

fn truncate_snippet(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let head: String = input.chars().take(max).collect();
    format!("{}...", head)
}

fn is_placeholder(key: &str) -> bool {
    let t = key.trim();
    t.is_empty()
        || t.contains("${")
        || t.eq_ignore_ascii_case("your-api-key-here")
        || t.eq_ignore_ascii_case("changeme")
}

/// Build the configured generator, wrapped in the bounded-wait/retry policy.
pub fn create_generator(config: &Config) -> Result<Arc<dyn Generator>> {
    let cfg = &config.generator;
    let policy = cfg.retry_policy();

    let inner: Arc<dyn Generator> = match cfg.provider {
        Provider::Ollama => {
            let endpoint = cfg.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
            let model = cfg
                .model
                .clone()
                .unwrap_or_else(|| ollama::DEFAULT_MODEL.to_string());
            info!("Using Ollama generator (model={}, endpoint={})", model, endpoint);
            Arc::new(
                OllamaGenerator::new(endpoint, model, policy.timeout)?
                    .with_temperature(cfg.temperature)
                    .with_max_tokens(cfg.max_tokens),
            )
        }
        Provider::OpenAi => {
            let endpoint = cfg.endpoint.as_deref().unwrap_or(openai::DEFAULT_BASE_URL);
            let api_key = config
                .runtime
                .api_key
                .clone()
                .filter(|k| !is_placeholder(k));
            if api_key.is_none() && endpoint == openai::DEFAULT_BASE_URL {
                return Err(PlanError::Config {
                    message: "provider=openai but neither BIZPLAN_API_KEY nor OPENAI_API_KEY is set"
                        .to_string(),
                });
            }
            let model = cfg
                .model
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
            info!(
                "Using OpenAI-compatible generator (model={}, endpoint={})",
                model, endpoint
            );
            Arc::new(
                OpenAiGenerator::new(endpoint, model, api_key, policy.timeout)?
                    .with_temperature(cfg.temperature)
                    .with_max_tokens(cfg.max_tokens),
            )
        }
    };

    info!(
        "Generator bounded: timeout={}ms, max_retries={}",
        policy.timeout.as_millis(),
        policy.max_retries
    );
    Ok(Arc::new(BoundedGenerator::new(inner, policy)))
}
