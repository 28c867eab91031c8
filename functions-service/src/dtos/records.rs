//! Bodies of the record-writing functions. These are snake_case, matching
//! the table columns.

use crate::models::{ActionStatus, EngagementAction, PostStatus, ScheduledPost};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_core::extract::{blank_as_none, blank_as_none_parsed};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LogEngagementRequest {
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    #[validate(required(message = "account_id is required"))]
    pub account_id: Option<Uuid>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "action_type is required"))]
    pub action_type: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub target_post_url: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub target_username: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub comment_text: Option<String>,

    pub status: Option<ActionStatus>,
}

#[derive(Debug, Serialize)]
pub struct LogEngagementResponse {
    pub success: bool,
    pub action: EngagementAction,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SchedulePostRequest {
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    #[validate(required(message = "account_id is required"))]
    pub account_id: Option<Uuid>,

    /// RFC 3339 timestamp.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "scheduled_for is required"))]
    pub scheduled_for: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub content_id: Option<Uuid>,

    pub payload: Option<serde_json::Value>,

    pub status: Option<PostStatus>,
}

#[derive(Debug, Deserialize)]
pub struct PublishPostRequest {
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub post_id: Option<Uuid>,
    /// Required only when `post_id` is absent.
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub account_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub success: bool,
    pub post: ScheduledPost,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SyncAccountRequest {
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    #[validate(required(message = "account_id is required"))]
    pub account_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SyncAccountResponse {
    pub success: bool,
    pub account_id: Uuid,
    pub last_synced_at: DateTime<Utc>,
}
