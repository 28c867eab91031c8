//! Upstream API abstractions and implementations.
//!
//! Each upstream (text completion, image generation, geocoding) sits behind a
//! trait so handlers can be exercised against mocks. Implementations never
//! retry; a failed call surfaces once as a [`ProviderError`].

pub mod mapbox;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The upstream answered with an error body we could read a message from.
    #[error("{0}")]
    ApiError(String),

    /// The upstream answered with a non-success status and no usable message.
    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Maps the failure onto the caller-facing error: the upstream's own
    /// message when it sent one, `default_message` otherwise.
    pub fn into_app_error(self, default_message: &str) -> AppError {
        match self {
            ProviderError::ApiError(message) => AppError::Upstream(message),
            other => {
                tracing::error!(error = %other, "Upstream call failed");
                AppError::Upstream(default_message.to_string())
            }
        }
    }
}

/// Pulls a human-readable message out of an upstream error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ".."}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let message = value
        .pointer("/error/message")
        .and_then(|m| m.as_str())
        .or_else(|| value.get("message").and_then(|m| m.as_str()))
        .or_else(|| value.get("error").and_then(|m| m.as_str()))?;

    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// Converts a non-success upstream response into a [`ProviderError`].
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    tracing::warn!(
        provider = provider,
        status = status.as_u16(),
        body_len = body.len(),
        "Upstream returned an error status"
    );

    match extract_error_message(&body) {
        Some(message) => ProviderError::ApiError(message),
        None => ProviderError::Status(status.as_u16()),
    }
}

// ============================================================================
// Text completion
// ============================================================================

/// One system + user exchange with fixed sampling parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}

// ============================================================================
// Image generation
// ============================================================================

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub style: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    pub prompt: String,
    /// PNG bytes of the image being edited.
    pub image: Vec<u8>,
    pub size: String,
}

/// Decoded image returned by the upstream.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub revised_prompt: Option<String>,
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError>;

    async fn edit(&self, request: &ImageEditRequest) -> Result<GeneratedImage, ProviderError>;
}

// ============================================================================
// Geocoding
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Best single match for a free-text query, `None` when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ProviderError>;
}
