use super::descriptions::{DescriptionPicker, DEMO_DESCRIPTIONS};
use super::ImageTextGenerator;
use crate::error::AdapterError;
use crate::models::{GenerationRequest, GenerationResult, MockSettings};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Offline generator used in demo mode and as the fallback adapter.
pub struct MockGenerator {
    latency: Duration,
    descriptions: DescriptionPicker,
}

impl MockGenerator {
    pub fn new(settings: &MockSettings) -> Self {
        Self {
            latency: settings.latency,
            descriptions: DescriptionPicker::new(settings.seed),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(&MockSettings::default())
    }
}

#[async_trait]
impl ImageTextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AdapterError> {
        if request.name.trim().is_empty() || request.profession.trim().is_empty() {
            return Err(AdapterError::Unknown(
                "Name and profession are required".to_string(),
            ));
        }

        tokio::time::sleep(self.latency).await;

        let description =
            self.descriptions
                .pick(DEMO_DESCRIPTIONS, &request.name, &request.profession);

        // Timestamp keeps consecutive placeholders from being cached as one image.
        let image_url = format!(
            "https://picsum.photos/1024/1024?random={}",
            Utc::now().timestamp_millis()
        );

        Ok(GenerationResult {
            image_url,
            description,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Generator replaying queued outcomes, for exercising callers.
///
/// Clones share the queue and the call counter, so a factory closure can hand
/// out a fresh clone per attempt while the test keeps the original.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    outcomes: Arc<Mutex<VecDeque<Result<GenerationResult, AdapterError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(self, result: GenerationResult) -> Self {
        self.push(Ok(result));
        self
    }

    pub fn with_error(self, error: AdapterError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, outcome: Result<GenerationResult, AdapterError>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }
}

#[async_trait]
impl ImageTextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AdapterError> {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        // Default once the script runs out
        next.unwrap_or_else(|| {
            Ok(GenerationResult {
                image_url: "https://example.com/postcard.png".to_string(),
                description: format!("{} es {}", request.name, request.profession),
            })
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
