use super::types::{ImageData, ImageGenerationRequest, ImageGenerationResponse};
use super::OpenAiAdapter;
use crate::ai::mime;
use crate::error::AdapterError;
use crate::models::GenerationRequest;
use crate::prompts;
use reqwest::multipart::{Form, Part};

/// Appended to the prompt since this endpoint cannot see the photo.
const FACE_REFERENCE: &str =
    "The person should have the exact facial features from the reference photo provided.";

const IMAGE_SIZE: &str = "1024x1024";

impl OpenAiAdapter {
    pub(super) async fn generate_image(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, AdapterError> {
        let prompt = prompts::build_image_prompt(&request.name, &request.profession);

        let body = ImageGenerationRequest {
            model: self.image_model.clone(),
            prompt: format!("{} {}", prompt, FACE_REFERENCE),
            n: 1,
            size: IMAGE_SIZE.to_string(),
            quality: "hd".to_string(),
            style: "vivid".to_string(),
        };

        let response: ImageGenerationResponse =
            self.http.post_json("/images/generations", &body).await?;

        first_image_url(response)
    }

    pub(super) async fn generate_variation(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, AdapterError> {
        let image = Part::bytes(request.source_image.clone())
            .file_name(mime::upload_file_name(&request.source_image))
            .mime_str(mime::upload_mime(&request.source_image))?;

        let form = Form::new()
            .part("image", image)
            .text("n", "1")
            .text("size", IMAGE_SIZE);

        let response: ImageGenerationResponse =
            self.http.post_multipart("/images/variations", form).await?;

        first_image_url(response)
    }
}

/// URL of the first artifact; inline base64 becomes a PNG data URI.
fn first_image_url(response: ImageGenerationResponse) -> Result<String, AdapterError> {
    let image = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::invalid_response("image"))?;

    match image {
        ImageData { url: Some(url), .. } if !url.trim().is_empty() => Ok(url),
        ImageData {
            b64_json: Some(b64),
            ..
        } if !b64.trim().is_empty() => Ok(format!("data:image/png;base64,{}", b64)),
        _ => Err(AdapterError::invalid_response("image")),
    }
}
