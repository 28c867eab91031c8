//! OpenAI provider implementation.
//!
//! Chat completions for text and the images API for generation and edits.
//! Images are always requested as `b64_json` and decoded here.

use super::{
    error_from_response, Completion, CompletionProvider, CompletionRequest, GeneratedImage,
    ImageEditRequest, ImageProvider, ImageRequest, ProviderError,
};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{multipart, Client};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Key-bearing OpenAI client shared by the completion and image functions.
pub struct OpenAiProvider {
    client: Client,
    api_key: Secret<String>,
    base_url: String,
    text_model: String,
    image_model: String,
    image_edit_model: String,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig, api_key: Secret<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            image_edit_model: config.image_edit_model.clone(),
        })
    }

    /// Provider from configuration, `None` when no key is set.
    pub fn from_config(config: &OpenAiConfig) -> Result<Option<Self>, ProviderError> {
        config
            .api_key
            .clone()
            .map(|key| Self::new(config, key))
            .transpose()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_image_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<GeneratedImage, ProviderError> {
        let response = request
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response("openai", response).await);
        }

        let body: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let first = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No image data returned".to_string()))?;

        let encoded = first
            .b64_json
            .ok_or_else(|| ProviderError::InvalidResponse("Image data missing b64_json".to_string()))?;

        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ProviderError::InvalidResponse(format!("Invalid base64 image: {}", e)))?;

        Ok(GeneratedImage {
            data,
            revised_prompt: first.revised_prompt,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.text_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %self.text_model,
            prompt_len = request.prompt.len(),
            "Sending request to OpenAI chat completions"
        );

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response("openai", response).await);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("No completion returned".to_string()))?;

        let usage = api_response.usage.unwrap_or_default();

        Ok(Completion {
            text,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        })
    }

    fn model(&self) -> &str {
        &self.text_model
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError> {
        let body = ImageGenerationRequest {
            model: &self.image_model,
            prompt: &request.prompt,
            n: 1,
            size: &request.size,
            quality: &request.quality,
            style: request.style.as_deref(),
            response_format: "b64_json",
        };

        tracing::debug!(
            model = %self.image_model,
            size = %request.size,
            "Sending request to OpenAI image generation"
        );

        self.send_image_request(self.client.post(self.url("images/generations")).json(&body))
            .await
    }

    async fn edit(&self, request: &ImageEditRequest) -> Result<GeneratedImage, ProviderError> {
        let image_part = multipart::Part::bytes(request.image.clone())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| ProviderError::InvalidResponse(format!("Invalid image part: {}", e)))?;

        let form = multipart::Form::new()
            .part("image", image_part)
            .text("prompt", request.prompt.clone())
            .text("model", self.image_edit_model.clone())
            .text("n", "1")
            .text("size", request.size.clone())
            .text("response_format", "b64_json");

        tracing::debug!(
            model = %self.image_edit_model,
            image_bytes = request.image.len(),
            "Sending request to OpenAI image edit"
        );

        self.send_image_request(self.client.post(self.url("images/edits")).multipart(form))
            .await
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}
