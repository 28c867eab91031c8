//! Completion-backed functions: post drafts, comment replies, search
//! queries and slide outlines.

use crate::dtos::{
    CommentSuggestions, GenerateContentRequest, GeneratedContent, SearchQueries,
    SearchQueriesRequest, SlideOutline, SlideOutlineRequest, SuggestCommentRequest,
};
use crate::services::metrics::record_upstream;
use crate::services::providers::CompletionRequest;
use crate::startup::AppState;
use crate::utils::structured::list_lines;
use crate::utils::{decode, Decoded};
use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

const DEFAULT_PLATFORM: &str = "linkedin";
const DEFAULT_QUERY_COUNT: i64 = 5;
const MAX_QUERY_COUNT: i64 = 20;
const DEFAULT_SLIDE_COUNT: i64 = 8;
const MAX_SLIDE_COUNT: i64 = 30;

/// One completion call; failures become the caller-facing error.
async fn complete(
    state: &AppState,
    request: CompletionRequest,
    default_error: &str,
) -> Result<String, AppError> {
    let provider = state.completion()?;

    let result = provider.complete(&request).await;
    record_upstream("openai", result.is_ok());
    let completion = result.map_err(|e| e.into_app_error(default_error))?;

    tracing::info!(
        model = provider.model(),
        input_tokens = completion.input_tokens,
        output_tokens = completion.output_tokens,
        "Completion received"
    );

    Ok(completion.text)
}

/// Reads a string list either wrapped in an object or as a bare array.
fn decode_list<W>(text: &str, unwrap: impl FnOnce(W) -> Vec<String>) -> Decoded<Vec<String>>
where
    W: serde::de::DeserializeOwned,
{
    match decode::<W>(text) {
        Decoded::Parsed(wrapped) => Decoded::Parsed(unwrap(wrapped)),
        Decoded::Fallback(raw) => decode::<Vec<String>>(&raw),
    }
}

#[axum::debug_handler]
pub async fn generate_content(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GenerateContentRequest>,
) -> Result<Json<GeneratedContent>, AppError> {
    let topic = req.topic.unwrap_or_default();
    let platform = req.platform.as_deref().unwrap_or(DEFAULT_PLATFORM);
    let tone = req.tone.as_deref().unwrap_or("professional");
    let content_type = req.content_type.as_deref().unwrap_or("post");

    let mut prompt = format!(
        "Write a {} {} for {} about: {}",
        tone, content_type, platform, topic
    );
    if !req.keywords.is_empty() {
        prompt.push_str(&format!("\nWork in these keywords: {}", req.keywords.join(", ")));
    }
    if let Some(context) = &req.additional_context {
        prompt.push_str(&format!("\nAdditional context: {}", context));
    }

    let system = format!(
        "You are a social media copywriter for {}. Reply with JSON only: \
         {{\"content\": string, \"hashtags\": string[], \"callToAction\": string}}.",
        platform
    );

    let text = complete(
        &state,
        CompletionRequest {
            system,
            prompt,
            temperature: 0.7,
            max_tokens: 1000,
        },
        "Failed to generate content",
    )
    .await?;

    let content = match decode::<GeneratedContent>(&text) {
        Decoded::Parsed(content) => content,
        Decoded::Fallback(raw) => {
            tracing::warn!("Content reply was not JSON; returning raw text");
            GeneratedContent {
                content: raw,
                hashtags: Vec::new(),
                call_to_action: None,
            }
        }
    };

    Ok(Json(content))
}

#[axum::debug_handler]
pub async fn suggest_comment_response(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SuggestCommentRequest>,
) -> Result<Json<CommentSuggestions>, AppError> {
    let comment = req.comment.unwrap_or_default();
    let tone = req.tone.as_deref().unwrap_or("friendly");

    let mut prompt = String::new();
    if let Some(post) = &req.post_content {
        prompt.push_str(&format!("Original post:\n{}\n\n", post));
    }
    match &req.commenter_name {
        Some(name) => prompt.push_str(&format!("Comment from {}:\n{}", name, comment)),
        None => prompt.push_str(&format!("Comment:\n{}", comment)),
    }

    let system = format!(
        "You help a creator reply to comments on their posts. Suggest three short, {} replies. \
         Reply with JSON only: {{\"suggestions\": string[]}}.",
        tone
    );

    let text = complete(
        &state,
        CompletionRequest {
            system,
            prompt,
            temperature: 0.8,
            max_tokens: 500,
        },
        "Failed to suggest comment response",
    )
    .await?;

    let suggestions = match decode_list(&text, |s: CommentSuggestions| s.suggestions) {
        Decoded::Parsed(suggestions) => suggestions,
        Decoded::Fallback(raw) => vec![raw],
    };

    Ok(Json(CommentSuggestions { suggestions }))
}

#[axum::debug_handler]
pub async fn generate_search_queries(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SearchQueriesRequest>,
) -> Result<Json<SearchQueries>, AppError> {
    let description = req.description.unwrap_or_default();
    let platform = req.platform.as_deref().unwrap_or(DEFAULT_PLATFORM);
    let count = req.count.unwrap_or(DEFAULT_QUERY_COUNT).clamp(1, MAX_QUERY_COUNT);

    let system = format!(
        "You write search queries that find relevant people and posts on {}. \
         Reply with JSON only: {{\"queries\": string[]}}.",
        platform
    );
    let prompt = format!(
        "Write {} distinct search queries for this audience:\n{}",
        count, description
    );

    let text = complete(
        &state,
        CompletionRequest {
            system,
            prompt,
            temperature: 0.5,
            max_tokens: 500,
        },
        "Failed to generate search queries",
    )
    .await?;

    let mut queries = match decode_list(&text, |q: SearchQueries| q.queries) {
        Decoded::Parsed(queries) => queries,
        Decoded::Fallback(raw) => list_lines(&raw),
    };
    queries.retain(|q| !q.trim().is_empty());
    queries.truncate(count as usize);

    Ok(Json(SearchQueries { queries }))
}

#[axum::debug_handler]
pub async fn generate_slide_outline(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SlideOutlineRequest>,
) -> Result<Json<SlideOutline>, AppError> {
    let topic = req.topic.unwrap_or_default();
    let slide_count = req
        .slide_count
        .unwrap_or(DEFAULT_SLIDE_COUNT)
        .clamp(1, MAX_SLIDE_COUNT);

    let mut prompt = format!("Outline a {}-slide presentation on: {}", slide_count, topic);
    if let Some(audience) = &req.audience {
        prompt.push_str(&format!("\nAudience: {}", audience));
    }
    if let Some(style) = &req.style {
        prompt.push_str(&format!("\nStyle: {}", style));
    }

    let system = "You are a presentation designer. Reply with JSON only: \
                  {\"title\": string, \"slides\": [{\"title\": string, \"bullets\": string[], \"notes\": string}]}."
        .to_string();

    let text = complete(
        &state,
        CompletionRequest {
            system,
            prompt,
            temperature: 0.7,
            max_tokens: 2000,
        },
        "Failed to generate slide outline",
    )
    .await?;

    let outline = match decode::<SlideOutline>(&text) {
        Decoded::Parsed(mut outline) => {
            if outline.title.trim().is_empty() {
                outline.title = topic;
            }
            outline.outline = None;
            outline
        }
        Decoded::Fallback(raw) => SlideOutline {
            title: topic,
            slides: Vec::new(),
            outline: Some(raw),
        },
    };

    Ok(Json(outline))
}
