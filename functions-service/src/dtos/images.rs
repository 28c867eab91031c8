use serde::{Deserialize, Serialize};
use service_core::extract::blank_as_none;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "prompt is required"))]
    pub prompt: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub quality: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
    pub file_name: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "prompt is required"))]
    pub prompt: Option<String>,

    /// http(s) URL or `data:` URL of the source image.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "imageUrl is required"))]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImageResponse {
    pub image_url: String,
    pub file_name: String,
    pub prompt: String,
    pub size: String,
    pub source_image_url: String,
}
