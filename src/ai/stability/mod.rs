//! Image-to-image diffusion provider.
//!
//! The source photo conditions the generation so the face survives. When that
//! call fails for any reason the adapter retries once as plain text-to-image
//! with the same prompts. This provider has no text endpoint, so descriptions
//! come from local templates.

pub mod types;

use super::descriptions::{DescriptionPicker, PROVIDER_DESCRIPTIONS};
use super::http::ProviderHttpClient;
use super::{mime, ImageTextGenerator};
use crate::error::AdapterError;
use crate::models::{GenerationRequest, GenerationResult};
use crate::prompts;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use types::{ArtifactsResponse, TextPrompt, TextToImageRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.stability.ai/v1";

const PROVIDER: &str = "stability";
const ENGINE: &str = "stable-diffusion-xl-1024-v1-0";
const TIMEOUT: Duration = Duration::from_secs(120);

/// Sampling parameters shared by both generation paths.
#[derive(Debug, Clone)]
pub struct DiffusionParams {
    pub cfg_scale: u32,
    pub steps: u32,
    pub style_preset: &'static str,
    /// How strongly the init image is kept; high values preserve the face.
    pub image_strength: f32,
    pub size: u32,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            cfg_scale: 7,
            steps: 30,
            style_preset: "cinematic",
            image_strength: 0.85,
            size: 1024,
        }
    }
}

pub struct StabilityAdapter {
    http: ProviderHttpClient,
    params: DiffusionParams,
    descriptions: DescriptionPicker,
}

impl StabilityAdapter {
    pub fn new(
        api_key: String,
        base_url: Option<&str>,
        seed: Option<u64>,
    ) -> Result<Self, AdapterError> {
        Ok(Self {
            http: ProviderHttpClient::new(PROVIDER, api_key, base_url, DEFAULT_BASE_URL, TIMEOUT)?,
            params: DiffusionParams::default(),
            descriptions: DescriptionPicker::new(seed),
        })
    }

    fn endpoint(kind: &str) -> String {
        format!("/generation/{}/{}", ENGINE, kind)
    }

    fn text_prompts(request: &GenerationRequest) -> [TextPrompt; 2] {
        [
            TextPrompt {
                text: prompts::build_image_prompt(&request.name, &request.profession),
                weight: 1.0,
            },
            TextPrompt {
                text: prompts::build_negative_prompt(),
                weight: -1.0,
            },
        ]
    }

    async fn generate_image(&self, request: &GenerationRequest) -> Result<String, AdapterError> {
        match self.image_to_image(request).await {
            Ok(url) => Ok(url),
            Err(e) => {
                tracing::warn!(
                    "Image-to-image generation failed ({}), falling back to text-to-image",
                    e
                );
                self.text_to_image(request).await
            }
        }
    }

    async fn image_to_image(&self, request: &GenerationRequest) -> Result<String, AdapterError> {
        let [positive, negative] = Self::text_prompts(request);
        let params = &self.params;

        let init_image = Part::bytes(request.source_image.clone())
            .file_name(mime::upload_file_name(&request.source_image))
            .mime_str(mime::upload_mime(&request.source_image))?;

        let form = Form::new()
            .part("init_image", init_image)
            .text("init_image_mode", "IMAGE_STRENGTH")
            .text("image_strength", params.image_strength.to_string())
            .text("text_prompts[0][text]", positive.text)
            .text("text_prompts[0][weight]", positive.weight.to_string())
            .text("text_prompts[1][text]", negative.text)
            .text("text_prompts[1][weight]", negative.weight.to_string())
            .text("cfg_scale", params.cfg_scale.to_string())
            .text("samples", "1")
            .text("steps", params.steps.to_string())
            .text("style_preset", params.style_preset);

        let response: ArtifactsResponse = self
            .http
            .post_multipart(&Self::endpoint("image-to-image"), form)
            .await?;

        first_artifact_uri(response)
    }

    async fn text_to_image(&self, request: &GenerationRequest) -> Result<String, AdapterError> {
        let params = &self.params;
        let body = TextToImageRequest {
            text_prompts: Self::text_prompts(request).to_vec(),
            cfg_scale: params.cfg_scale,
            height: params.size,
            width: params.size,
            samples: 1,
            steps: params.steps,
            style_preset: params.style_preset.to_string(),
        };

        let response: ArtifactsResponse = self
            .http
            .post_json(&Self::endpoint("text-to-image"), &body)
            .await?;

        first_artifact_uri(response)
    }
}

fn first_artifact_uri(response: ArtifactsResponse) -> Result<String, AdapterError> {
    response
        .artifacts
        .into_iter()
        .next()
        .map(|artifact| artifact.base64)
        .filter(|b64| !b64.trim().is_empty())
        .map(|b64| format!("data:image/png;base64,{}", b64))
        .ok_or_else(|| AdapterError::invalid_response(PROVIDER))
}

#[async_trait]
impl ImageTextGenerator for StabilityAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AdapterError> {
        self.http.ensure_api_key()?;

        let image_url = self.generate_image(request).await?;
        let description =
            self.descriptions
                .pick(PROVIDER_DESCRIPTIONS, &request.name, &request.profession);

        Ok(GenerationResult {
            image_url,
            description,
        })
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
