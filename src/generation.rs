//! Generation orchestration: adapter selection, demo mode and retries.

use crate::ai::{Generator, GeneratorFactory, ImageTextGenerator};
use crate::error::AdapterError;
use crate::models::{GenerationConfig, GenerationRequest, GenerationResult, MockSettings};
use crate::prompts;
use crate::Result;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delays between attempts: `base_delay`, then doubling, capped at `max_delay`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        // ExponentialBackoff yields factor * 2^n starting at n = 1.
        let factor = (self.base_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// A successful generation and how many attempts failed before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub result: GenerationResult,
    pub failure_count: u32,
    pub provider: String,
}

pub struct Orchestrator {
    factory: GeneratorFactory,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new(mock: MockSettings) -> Self {
        Self {
            factory: GeneratorFactory::new(mock),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate with the adapter `config` selects.
    ///
    /// Without an API key the mock is used directly (demo mode).
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        config: &GenerationConfig,
    ) -> Result<Generation> {
        if config.api_key().is_none() {
            info!("No API key configured, running in demo mode");
        }
        self.generate_with(request, || self.select_generator(config))
            .await
    }

    /// Adapter for one attempt. Never fails: any factory error becomes the mock.
    pub fn select_generator(&self, config: &GenerationConfig) -> Generator {
        let Some(api_key) = config.api_key() else {
            return self.factory.mock();
        };

        match self
            .factory
            .create(config.provider_id(), api_key, config.base_url.as_deref())
        {
            Ok(generator) => generator,
            Err(e) => {
                warn!("Adapter selection failed: {}. Falling back to the mock", e);
                self.factory.mock()
            }
        }
    }

    /// Run the retry loop, asking `make_generator` for a fresh adapter on every
    /// attempt.
    pub async fn generate_with<G, F>(
        &self,
        request: &GenerationRequest,
        make_generator: F,
    ) -> Result<Generation>
    where
        G: ImageTextGenerator,
        F: Fn() -> G,
    {
        prompts::validate_request_fields(&request.name, &request.profession)?;

        let failures = AtomicU32::new(0);
        let attempts = AtomicU32::new(0);
        let max_attempts = self.retry.max_attempts.max(1);

        let outcome = RetryIf::spawn(
            self.retry.delays(),
            || {
                let generator = make_generator();
                let failures = &failures;
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    info!(
                        "Generation attempt {}/{} with {}",
                        attempt,
                        max_attempts,
                        generator.name()
                    );
                    match generator.generate(request).await.and_then(ensure_complete) {
                        Ok(result) => Ok((result, generator.name().to_string())),
                        Err(e) => {
                            failures.fetch_add(1, Ordering::SeqCst);
                            warn!(
                                "Generation attempt {}/{} failed: {}",
                                attempt, max_attempts, e
                            );
                            Err(e)
                        }
                    }
                }
            },
            |e: &AdapterError| e.is_retryable(),
        )
        .await;

        match outcome {
            Ok((result, provider)) => {
                let failure_count = failures.load(Ordering::SeqCst);
                info!(
                    "Generation succeeded with {} after {} failed attempt(s)",
                    provider, failure_count
                );
                Ok(Generation {
                    result,
                    failure_count,
                    provider,
                })
            }
            Err(e) => {
                error!(
                    "Generation failed after {} attempt(s): {}",
                    attempts.load(Ordering::SeqCst),
                    e
                );
                Err(e.into())
            }
        }
    }
}

/// Partial results are not a success.
fn ensure_complete(result: GenerationResult) -> std::result::Result<GenerationResult, AdapterError> {
    if result.image_url.trim().is_empty() {
        return Err(AdapterError::InvalidResponse(
            "The generated image is missing".to_string(),
        ));
    }
    if result.description.trim().is_empty() {
        return Err(AdapterError::InvalidResponse(
            "The generated description is missing".to_string(),
        ));
    }
    Ok(result)
}
