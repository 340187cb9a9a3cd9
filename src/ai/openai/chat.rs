use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::OpenAiAdapter;
use crate::error::AdapterError;
use crate::models::GenerationRequest;
use crate::prompts;

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.8;

impl OpenAiAdapter {
    pub(super) async fn generate_description(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, AdapterError> {
        let body = ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage::new("system", prompts::TEXT_SYSTEM.trim()),
                ChatMessage::new(
                    "user",
                    prompts::build_text_prompt(&request.name, &request.profession),
                ),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response: ChatCompletionResponse =
            self.http.post_json("/chat/completions", &body).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AdapterError::invalid_response("text"))
    }
}
