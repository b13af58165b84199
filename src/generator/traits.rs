use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("provider returned an empty completion")]
    EmptyCompletion,
    #[error("generator not configured: {0}")]
    NotConfigured(String),
}

impl GeneratorError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GeneratorError::Timeout { .. }
            | GeneratorError::Transport(_)
            | GeneratorError::EmptyCompletion => true,
            GeneratorError::Provider { status, .. } => *status == 429 || *status >= 500,
            GeneratorError::ParseError(_) | GeneratorError::NotConfigured(_) => false,
        }
    }
}

/// Produces free-text business plans for an industry pair.
///
/// Implementors return the model's raw completion; section extraction
/// happens in the resolver.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short backend name for logs (e.g. "ollama").
    fn name(&self) -> &str;

    async fn generate(
        &self,
        main_industry: &str,
        sub_industry: &str,
    ) -> Result<String, GeneratorError>;
}

// Must stay usable as `dyn Generator`.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};
