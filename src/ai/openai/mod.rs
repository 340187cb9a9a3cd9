//! Image + chat completion provider.
//!
//! One generation issues the image request and the description request
//! concurrently; the first failure fails the whole call.

pub mod chat;
pub mod image;
pub mod types;

use super::http::ProviderHttpClient;
use super::ImageTextGenerator;
use crate::error::AdapterError;
use crate::models::{GenerationRequest, GenerationResult};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "openai";
const TIMEOUT: Duration = Duration::from_secs(60);

/// How the image half of a generation is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    /// Text-to-image from the built prompt.
    #[default]
    Generation,
    /// Variations of the uploaded source photo.
    Variation,
}

pub struct OpenAiAdapter {
    http: ProviderHttpClient,
    mode: ImageMode,
    image_model: String,
    chat_model: String,
}

impl OpenAiAdapter {
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, AdapterError> {
        Ok(Self {
            http: ProviderHttpClient::new(PROVIDER, api_key, base_url, DEFAULT_BASE_URL, TIMEOUT)?,
            mode: ImageMode::default(),
            image_model: "dall-e-3".to_string(),
            chat_model: "gpt-4".to_string(),
        })
    }

    pub fn with_mode(mut self, mode: ImageMode) -> Self {
        self.mode = mode;
        self
    }
}

#[async_trait]
impl ImageTextGenerator for OpenAiAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AdapterError> {
        self.http.ensure_api_key()?;

        let image = async {
            match self.mode {
                ImageMode::Generation => self.generate_image(request).await,
                ImageMode::Variation => self.generate_variation(request).await,
            }
        };

        let (image_url, description) =
            tokio::try_join!(image, self.generate_description(request))?;

        Ok(GenerationResult {
            image_url,
            description,
        })
    }

    fn name(&self) -> &str {
        match self.mode {
            ImageMode::Generation => "openai",
            ImageMode::Variation => "openai-variations",
        }
    }
}
