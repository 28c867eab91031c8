//! Scheduled post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Publication state. Rows are created `pending` and flipped to `published`
/// by the publish function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Pending,
    Published,
    Failed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Published => "published",
            PostStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledPost {
    pub id: Uuid,
    pub account_id: Uuid,
    pub content_id: Option<Uuid>,
    pub scheduled_for: DateTime<Utc>,
    pub payload: serde_json::Value,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateScheduledPost {
    pub account_id: Uuid,
    pub content_id: Option<Uuid>,
    pub scheduled_for: DateTime<Utc>,
    pub payload: serde_json::Value,
    pub status: PostStatus,
}
