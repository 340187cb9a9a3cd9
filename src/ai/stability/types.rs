//! Stability REST payloads for the SDXL generation endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct TextPrompt {
    pub text: String,
    pub weight: f32,
}

/// JSON body of the text-to-image endpoint.
#[derive(Debug, Serialize)]
pub struct TextToImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: u32,
    pub height: u32,
    pub width: u32,
    pub samples: u32,
    pub steps: u32,
    pub style_preset: String,
}

/// Response of both generation endpoints.
#[derive(Debug, Deserialize)]
pub struct ArtifactsResponse {
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub base64: String,
    pub finish_reason: Option<String>,
    pub seed: Option<u64>,
}
