//! Mock provider implementations for testing.

use super::{
    Completion, CompletionProvider, CompletionRequest, GeneratedImage, GeocodeMatch,
    GeocodingProvider, ImageEditRequest, ImageProvider, ImageRequest, ProviderError,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Smallest valid PNG (1x1 transparent pixel).
pub const MOCK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

enum Outcome<T> {
    Succeed(T),
    Fail(String),
}

impl<T: Clone> Outcome<T> {
    fn result(&self) -> Result<T, ProviderError> {
        match self {
            Outcome::Succeed(value) => Ok(value.clone()),
            Outcome::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }
}

/// Mock completion provider that replies with fixed text and records prompts.
pub struct MockCompletionProvider {
    outcome: Outcome<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Succeed(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an upstream error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let text = self.outcome.result()?;
        Ok(Completion {
            input_tokens: request.prompt.len() as u32 / 4,
            output_tokens: text.len() as u32 / 4,
            text,
        })
    }

    fn model(&self) -> &str {
        "mock-text"
    }
}

/// Mock image provider returning [`MOCK_PNG`] for both generation and edits.
pub struct MockImageProvider {
    outcome: Outcome<GeneratedImage>,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self::with_revised_prompt(None)
    }

    pub fn with_revised_prompt(revised_prompt: Option<&str>) -> Self {
        Self {
            outcome: Outcome::Succeed(GeneratedImage {
                data: MOCK_PNG.to_vec(),
                revised_prompt: revised_prompt.map(str::to_string),
            }),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
        }
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, _request: &ImageRequest) -> Result<GeneratedImage, ProviderError> {
        self.outcome.result()
    }

    async fn edit(&self, request: &ImageEditRequest) -> Result<GeneratedImage, ProviderError> {
        if request.image.is_empty() {
            return Err(ProviderError::InvalidResponse("empty source image".to_string()));
        }
        self.outcome.result()
    }
}

/// Mock geocoder with a single canned answer.
pub struct MockGeocodingProvider {
    outcome: Outcome<Option<GeocodeMatch>>,
}

impl MockGeocodingProvider {
    pub fn with_match(latitude: f64, longitude: f64, place_name: &str) -> Self {
        Self {
            outcome: Outcome::Succeed(Some(GeocodeMatch {
                latitude,
                longitude,
                place_name: place_name.to_string(),
            })),
        }
    }

    /// Answers every query with zero matches.
    pub fn empty() -> Self {
        Self {
            outcome: Outcome::Succeed(None),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
        }
    }
}

#[async_trait]
impl GeocodingProvider for MockGeocodingProvider {
    async fn geocode(&self, _query: &str) -> Result<Option<GeocodeMatch>, ProviderError> {
        self.outcome.result()
    }
}
