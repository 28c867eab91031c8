//! In-memory datastore for tests.

use super::Datastore;
use crate::models::{
    CreateEngagementAction, CreateScheduledPost, EngagementAction, Location, NewSocialUser,
    PostStatus, ScheduledPost, SocialAccount,
};
use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct MockTables {
    users: HashMap<String, Uuid>,
    actions: Vec<EngagementAction>,
    posts: Vec<ScheduledPost>,
    locations: Vec<Location>,
    accounts: Vec<SocialAccount>,
}

/// Mock datastore. With `failing` set, every call returns a database error.
#[derive(Default)]
pub struct MockDatastore {
    failing: bool,
    tables: Mutex<MockTables>,
}

impl MockDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, MockTables>, AppError> {
        if self.failing {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "mock datastore unavailable"
            )));
        }
        self.tables
            .lock()
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Mock datastore mutex poisoned: {}", e)))
    }

    /// Lock for the inspection helpers, which ignore the `failing` flag.
    fn lock(&self) -> MutexGuard<'_, MockTables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn seed_location(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.lock()
            .locations
            .push(Location {
                id,
                name: Some(name.to_string()),
                latitude: None,
                longitude: None,
                updated_at: Utc::now(),
            });
        id
    }

    pub fn seed_account(&self, platform: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.lock()
            .accounts
            .push(SocialAccount {
                id,
                platform: platform.to_string(),
                handle: None,
                last_synced_at: None,
                created_at: Utc::now(),
            });
        id
    }

    pub fn user_id(&self, username: &str) -> Option<Uuid> {
        self.lock()
            .users
            .get(username)
            .copied()
    }

    pub fn engagement_actions(&self) -> Vec<EngagementAction> {
        self.lock()
            .actions
            .clone()
    }

    pub fn scheduled_posts(&self) -> Vec<ScheduledPost> {
        self.lock()
            .posts
            .clone()
    }

    pub fn location(&self, id: Uuid) -> Option<Location> {
        self.lock()
            .locations
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }
}

#[async_trait]
impl Datastore for MockDatastore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.tables().map(|_| ())
    }

    async fn upsert_social_user(&self, user: &NewSocialUser) -> Result<Uuid, AppError> {
        let mut tables = self.tables()?;
        let id = *tables
            .users
            .entry(user.username.clone())
            .or_insert_with(Uuid::new_v4);
        Ok(id)
    }

    async fn insert_engagement_action(
        &self,
        input: &CreateEngagementAction,
    ) -> Result<EngagementAction, AppError> {
        let action = EngagementAction {
            id: Uuid::new_v4(),
            account_id: input.account_id,
            action_type: input.action_type.clone(),
            target_post_url: input.target_post_url.clone(),
            target_user_id: input.target_user_id,
            target_username: input.target_username.clone(),
            comment_text: input.comment_text.clone(),
            status: input.status.as_str().to_string(),
            created_at: Utc::now(),
        };
        self.tables()?.actions.push(action.clone());
        Ok(action)
    }

    async fn insert_scheduled_post(
        &self,
        input: &CreateScheduledPost,
    ) -> Result<ScheduledPost, AppError> {
        let now = Utc::now();
        let post = ScheduledPost {
            id: Uuid::new_v4(),
            account_id: input.account_id,
            content_id: input.content_id,
            scheduled_for: input.scheduled_for,
            payload: input.payload.clone(),
            status: input.status.as_str().to_string(),
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tables()?.posts.push(post.clone());
        Ok(post)
    }

    async fn mark_post_published(&self, post_id: Uuid) -> Result<Option<ScheduledPost>, AppError> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        Ok(tables.posts.iter_mut().find(|p| p.id == post_id).map(|post| {
            post.status = PostStatus::Published.as_str().to_string();
            post.published_at = Some(now);
            post.updated_at = now;
            post.clone()
        }))
    }

    async fn update_location_coordinates(
        &self,
        location_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, AppError> {
        let mut tables = self.tables()?;
        Ok(tables
            .locations
            .iter_mut()
            .find(|l| l.id == location_id)
            .map(|location| {
                location.latitude = Some(latitude);
                location.longitude = Some(longitude);
                location.updated_at = Utc::now();
                location.clone()
            }))
    }

    async fn stamp_account_sync(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SocialAccount>, AppError> {
        let mut tables = self.tables()?;
        Ok(tables
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .map(|account| {
                account.last_synced_at = Some(Utc::now());
                account.clone()
            }))
    }
}
