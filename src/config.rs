use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::generator::RetryPolicy;

/// Upper bound on generator retries; the policy is meant to be "retry once or fail".
pub const MAX_GENERATOR_RETRIES: u32 = 3;

/// Slack added on top of the generator's worst case for extraction and I/O.
const REQUEST_TIMEOUT_HEADROOM_MS: u64 = 5_000;

/// Main configuration structure loaded from bizplan.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub generator: GeneratorConfig,
    pub server: ServerConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Location of the catalog dataset
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/business_plans.csv"),
        }
    }
}

/// Model backend selection. TOML and BIZPLAN_PROVIDER accept the same
/// case-insensitive spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provider {
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" | "openai-compatible" => Ok(Provider::OpenAi),
            other => anyhow::bail!("unknown generator provider '{}'", other),
        }
    }
}

/// Generator backend and its bounded-wait policy
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub provider: Provider,
    /// Backend root or full chat URL; provider default when unset
    pub endpoint: Option<String>,
    /// Model name; provider default when unset
    pub model: Option<String>,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            endpoint: None,
            model: None,
            timeout_ms: 30_000,
            max_retries: 1,
            retry_delay_ms: 500,
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

impl GeneratorConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(self.timeout_ms),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// HTTP API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8790)),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_key: Option<String>,
    pub log_level: String,
    pub http_request_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            log_level: "bizplan=info".to_string(),
            http_request_timeout_ms: 120_000,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: env("BIZPLAN_API_KEY").or_else(|| env("OPENAI_API_KEY")),
            log_level: env("RUST_LOG").unwrap_or(defaults.log_level),
            http_request_timeout_ms: env("BIZPLAN_HTTP_REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_request_timeout_ms),
        }
    }
}

/// Load `.env` (or BIZPLAN_ENV_FILE) into the process environment, if present
pub fn load_env_file() {
    if let Ok(env_path) = std::env::var("BIZPLAN_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::dotenv();
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses BIZPLAN_CONFIG environment variable or defaults to "bizplan.toml"
    pub fn load() -> anyhow::Result<Self> {
        load_env_file();
        match std::env::var("BIZPLAN_CONFIG") {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::read_file("bizplan.toml", false)?.finish(),
        }
    }

    /// Load from a TOML path the caller named explicitly; the file must be readable.
    pub fn load_from(config_path: &str) -> anyhow::Result<Self> {
        Self::read_file(config_path, true)?.finish()
    }

    fn read_file(config_path: &str, required: bool) -> anyhow::Result<Self> {
        match std::fs::read_to_string(config_path) {
            Ok(content) => {
                tracing::debug!("Loaded config file {}", config_path);
                Self::from_toml_str(&content)
                    .map_err(|e| anyhow::anyhow!("config file {}: {}", config_path, e))
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found, using defaults", config_path);
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "cannot read config file {}: {}",
                config_path,
                e
            )),
        }
    }

    /// Apply process env overrides and runtime settings, then validate
    fn finish(mut self) -> anyhow::Result<Self> {
        self.apply_env_overrides(|key| std::env::var(key).ok())?;
        self.runtime = RuntimeConfig::load_from_env();
        self.validate()?;
        Ok(self)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-first overrides from the given lookup
    pub fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(path) = env("BIZPLAN_DATASET") {
            self.dataset.path = PathBuf::from(path);
            tracing::debug!("BIZPLAN_DATASET env override applied");
        }
        if let Some(provider) = env("BIZPLAN_PROVIDER") {
            self.generator.provider = provider.parse()?;
        }
        if let Some(endpoint) = env("BIZPLAN_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.generator.endpoint = Some(endpoint);
        }
        if let Some(model) = env("BIZPLAN_MODEL").filter(|v| !v.trim().is_empty()) {
            self.generator.model = Some(model);
        }
        if let Some(v) = env("BIZPLAN_TIMEOUT_MS") {
            self.generator.timeout_ms = v
                .parse()
                .map_err(|e| anyhow::anyhow!("BIZPLAN_TIMEOUT_MS '{}': {}", v, e))?;
        }
        if let Some(v) = env("BIZPLAN_MAX_RETRIES") {
            self.generator.max_retries = v
                .parse()
                .map_err(|e| anyhow::anyhow!("BIZPLAN_MAX_RETRIES '{}': {}", v, e))?;
        }
        if let Some(v) = env("BIZPLAN_RETRY_DELAY_MS") {
            self.generator.retry_delay_ms = v
                .parse()
                .map_err(|e| anyhow::anyhow!("BIZPLAN_RETRY_DELAY_MS '{}': {}", v, e))?;
        }
        if let Some(v) = env("BIZPLAN_HTTP_BIND") {
            self.server.bind = v
                .parse()
                .map_err(|e| anyhow::anyhow!("BIZPLAN_HTTP_BIND '{}': {}", v, e))?;
        }
        Ok(())
    }

    /// Validate and clamp values that have a safe fallback
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.generator.timeout_ms == 0 {
            anyhow::bail!("generator.timeout_ms must be > 0");
        }
        if self.generator.max_retries > MAX_GENERATOR_RETRIES {
            tracing::warn!(
                "generator.max_retries {} exceeds max {}, clamping",
                self.generator.max_retries,
                MAX_GENERATOR_RETRIES
            );
            self.generator.max_retries = MAX_GENERATOR_RETRIES;
        }
        if !(0.0..=2.0).contains(&self.generator.temperature) {
            anyhow::bail!("generator.temperature must be between 0.0 and 2.0");
        }
        if self.runtime.http_request_timeout_ms == 0 {
            anyhow::bail!("BIZPLAN_HTTP_REQUEST_TIMEOUT_MS must be > 0");
        }

        // The request deadline must outlast every generator attempt so a
        // backend failure surfaces as 502 rather than a 408.
        let generator_budget = self.generator.retry_policy().worst_case()
            + Duration::from_millis(REQUEST_TIMEOUT_HEADROOM_MS);
        let request_timeout = Duration::from_millis(self.runtime.http_request_timeout_ms);
        if request_timeout < generator_budget {
            tracing::warn!(
                "HTTP request timeout {}ms is shorter than the generator budget {}ms, raising",
                self.runtime.http_request_timeout_ms,
                generator_budget.as_millis()
            );
            self.runtime.http_request_timeout_ms = generator_budget.as_millis() as u64;
        }
        Ok(())
    }
}
