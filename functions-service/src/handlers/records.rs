//! Record-writing functions: engagement log, post scheduling and the
//! publish / sync placeholders.

use crate::dtos::{
    LogEngagementRequest, LogEngagementResponse, PostResponse, PublishPostRequest,
    SchedulePostRequest, SyncAccountRequest, SyncAccountResponse,
};
use crate::models::{CreateEngagementAction, CreateScheduledPost, NewSocialUser, PostStatus};
use crate::services::users::upsert_social_user;
use crate::startup::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use service_core::extract::{JsonBody, ValidatedJson};
use uuid::Uuid;

#[axum::debug_handler]
pub async fn log_engagement(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LogEngagementRequest>,
) -> Result<Json<LogEngagementResponse>, AppError> {
    let datastore = state.datastore()?;

    let target_user_id = match &req.target_username {
        Some(username) => {
            upsert_social_user(datastore, NewSocialUser::new(username).with_source("engagement"))
                .await
        }
        None => None,
    };

    let input = CreateEngagementAction {
        account_id: req.account_id.unwrap_or_default(),
        action_type: req.action_type.unwrap_or_default(),
        target_post_url: req.target_post_url,
        target_user_id,
        target_username: req.target_username,
        comment_text: req.comment_text,
        status: req.status.unwrap_or_default(),
    };

    let action = datastore.insert_engagement_action(&input).await?;

    Ok(Json(LogEngagementResponse {
        success: true,
        action,
    }))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::BadRequest("scheduled_for must be an RFC 3339 timestamp".to_string())
        })
}

#[axum::debug_handler]
pub async fn schedule_post(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SchedulePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let scheduled_for = parse_timestamp(req.scheduled_for.as_deref().unwrap_or_default())?;
    let datastore = state.datastore()?;

    let input = CreateScheduledPost {
        account_id: req.account_id.unwrap_or_default(),
        content_id: req.content_id,
        scheduled_for,
        payload: req
            .payload
            .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        status: req.status.unwrap_or_default(),
    };

    let post = datastore.insert_scheduled_post(&input).await?;

    Ok(Json(PostResponse {
        success: true,
        post,
    }))
}

/// Marks a post published. No third-party publish happens here.
#[axum::debug_handler]
pub async fn publish_post(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PublishPostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let datastore = state.datastore()?;

    let post_id: Uuid = match req.post_id {
        Some(id) => id,
        None => {
            let account_id = req
                .account_id
                .ok_or_else(|| AppError::BadRequest("account_id is required".to_string()))?;

            let draft = datastore
                .insert_scheduled_post(&CreateScheduledPost {
                    account_id,
                    content_id: None,
                    scheduled_for: Utc::now(),
                    payload: serde_json::Value::Object(Default::default()),
                    status: PostStatus::Pending,
                })
                .await?;
            draft.id
        }
    };

    let post = datastore
        .mark_post_published(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Scheduled post not found".to_string()))?;

    tracing::info!(post_id = %post.id, "Post marked published");

    Ok(Json(PostResponse {
        success: true,
        post,
    }))
}

/// Stamps the account's sync time. No external sync happens here.
#[axum::debug_handler]
pub async fn sync_account(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SyncAccountRequest>,
) -> Result<Json<SyncAccountResponse>, AppError> {
    let datastore = state.datastore()?;
    let account_id = req.account_id.unwrap_or_default();

    let account = datastore
        .stamp_account_sync(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    let last_synced_at = account.last_synced_at.unwrap_or_else(Utc::now);

    Ok(Json(SyncAccountResponse {
        success: true,
        account_id: account.id,
        last_synced_at,
    }))
}
