//! Engagement action log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a logged engagement action. New entries start `queued`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    #[default]
    Queued,
    Completed,
    Failed,
    Skipped,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Queued => "queued",
            ActionStatus::Completed => "completed",
            ActionStatus::Failed => "failed",
            ActionStatus::Skipped => "skipped",
        }
    }
}

/// Engagement action log entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EngagementAction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub action_type: String,
    pub target_post_url: Option<String>,
    pub target_user_id: Option<Uuid>,
    pub target_username: Option<String>,
    pub comment_text: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Input for appending an engagement action.
#[derive(Debug, Clone)]
pub struct CreateEngagementAction {
    pub account_id: Uuid,
    pub action_type: String,
    pub target_post_url: Option<String>,
    pub target_user_id: Option<Uuid>,
    pub target_username: Option<String>,
    pub comment_text: Option<String>,
    pub status: ActionStatus,
}
