//! Request and response bodies of the completion-backed functions.
//!
//! Bodies are camelCase, matching the web client. The response types double
//! as the JSON shapes the model is asked to produce.

use serde::{Deserialize, Serialize};
use service_core::extract::blank_as_none;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "topic is required"))]
    pub topic: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub tone: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub content_type: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub additional_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub call_to_action: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestCommentRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "comment is required"))]
    pub comment: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub post_content: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub commenter_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentSuggestions {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueriesRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "description is required"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub platform: Option<String>,

    /// Clamped by the handler, so out-of-range values are accepted.
    pub count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQueries {
    pub queries: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SlideOutlineRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "topic is required"))]
    pub topic: Option<String>,

    pub slide_count: Option<i64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub audience: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideOutline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Raw model text, present only when the reply could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
