//! Bounded-wait and retry wrapper for any [`Generator`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::traits::{Generator, GeneratorError};

/// Per-attempt timeout plus a small number of retries with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, retry: u32) -> Duration {
        self.retry_delay * (1u32 << retry.saturating_sub(1).min(16))
    }

    /// Longest a single `generate` call can take: every attempt timing out
    /// plus all backoff sleeps.
    pub fn worst_case(&self) -> Duration {
        let attempts = self.timeout * (self.max_retries + 1);
        let sleeps: Duration = (1..=self.max_retries).map(|r| self.backoff(r)).sum();
        attempts + sleeps
    }
}

pub struct BoundedGenerator {
    inner: Arc<dyn Generator>,
    policy: RetryPolicy,
}

impl BoundedGenerator {
    pub fn new(inner: Arc<dyn Generator>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl Generator for BoundedGenerator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(
        &self,
        main_industry: &str,
        sub_industry: &str,
    ) -> Result<String, GeneratorError> {
        let timeout_ms = self.policy.timeout.as_millis() as u64;
        let attempts = self.policy.max_retries + 1;

        let mut attempt = 0;
        loop {
            if attempt > 0 {
                tokio::time::sleep(self.policy.backoff(attempt)).await;
            }

            let result = match tokio::time::timeout(
                self.policy.timeout,
                self.inner.generate(main_industry, sub_industry),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GeneratorError::Timeout { timeout_ms }),
            };

            match result {
                Ok(text) => {
                    if attempt > 0 {
                        info!(
                            "{} succeeded on attempt {}/{}",
                            self.inner.name(),
                            attempt + 1,
                            attempts
                        );
                    }
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    warn!(
                        "{} attempt {}/{} failed, retrying: {}",
                        self.inner.name(),
                        attempt + 1,
                        attempts,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
