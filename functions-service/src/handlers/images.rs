//! Image generation and editing. Both store the resulting PNG in object
//! storage and answer with its public URL.

use crate::dtos::{EditImageRequest, EditImageResponse, GenerateImageRequest, GenerateImageResponse};
use crate::services::metrics::record_upstream;
use crate::services::providers::{GeneratedImage, ImageEditRequest, ImageRequest};
use crate::services::ObjectStorage;
use crate::startup::AppState;
use crate::utils::{media, unique_object_name};
use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

const DEFAULT_SIZE: &str = "1024x1024";
const DEFAULT_QUALITY: &str = "standard";

/// Upload under a fresh name; returns `(public_url, file_name)`.
async fn store_png(
    storage: &dyn ObjectStorage,
    prefix: &str,
    image: GeneratedImage,
    default_error: &str,
) -> Result<(String, String), AppError> {
    let file_name = unique_object_name(prefix, "png");
    let size = image.data.len();

    storage
        .upload(&file_name, image.data, "image/png")
        .await
        .map_err(|e| {
            tracing::error!(file_name = %file_name, error = %e, "Image upload failed");
            AppError::Upstream(default_error.to_string())
        })?;

    tracing::info!(file_name = %file_name, bytes = size, "Image stored");
    Ok((storage.public_url(&file_name), file_name))
}

#[axum::debug_handler]
pub async fn generate_image(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    const DEFAULT_ERROR: &str = "Failed to generate image";

    let images = state.images()?;
    let storage = state.storage()?;

    let request = ImageRequest {
        prompt: req.prompt.unwrap_or_default(),
        size: req.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
        quality: req.quality.unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
        style: req.style,
    };

    let result = images.generate(&request).await;
    record_upstream("openai", result.is_ok());
    let image = result.map_err(|e| e.into_app_error(DEFAULT_ERROR))?;
    let revised_prompt = image.revised_prompt.clone();

    let (image_url, file_name) = store_png(storage, "generated", image, DEFAULT_ERROR).await?;

    Ok(Json(GenerateImageResponse {
        image_url,
        file_name,
        prompt: request.prompt,
        size: request.size,
        quality: request.quality,
        revised_prompt,
    }))
}

#[axum::debug_handler]
pub async fn edit_image(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EditImageRequest>,
) -> Result<Json<EditImageResponse>, AppError> {
    const DEFAULT_ERROR: &str = "Failed to edit image";

    let images = state.images()?;
    let storage = state.storage()?;

    let source_image_url = req.image_url.unwrap_or_default();
    let source = media::resolve_image(&state.http, &source_image_url).await?;

    let request = ImageEditRequest {
        prompt: req.prompt.unwrap_or_default(),
        image: source,
        size: req.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
    };

    let result = images.edit(&request).await;
    record_upstream("openai", result.is_ok());
    let image = result.map_err(|e| e.into_app_error(DEFAULT_ERROR))?;

    let (image_url, file_name) = store_png(storage, "edited", image, DEFAULT_ERROR).await?;

    Ok(Json(EditImageResponse {
        image_url,
        file_name,
        prompt: request.prompt,
        size: request.size,
        source_image_url,
    }))
}
