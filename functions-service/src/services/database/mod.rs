//! Datastore seam. Handlers only see [`Datastore`]; production wires in
//! [`PgDatastore`], tests wire in [`MockDatastore`].

mod mock;
mod postgres;

pub use mock::MockDatastore;
pub use postgres::PgDatastore;

use crate::models::{
    CreateEngagementAction, CreateScheduledPost, EngagementAction, Location, NewSocialUser,
    ScheduledPost, SocialAccount,
};
use async_trait::async_trait;
use service_core::error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait Datastore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    /// Calls the `upsert_social_user` routine. `user.username` must already be
    /// normalized.
    async fn upsert_social_user(&self, user: &NewSocialUser) -> Result<Uuid, AppError>;

    async fn insert_engagement_action(
        &self,
        input: &CreateEngagementAction,
    ) -> Result<EngagementAction, AppError>;

    async fn insert_scheduled_post(
        &self,
        input: &CreateScheduledPost,
    ) -> Result<ScheduledPost, AppError>;

    /// Flips a post to `published`. `None` when no row has that id.
    async fn mark_post_published(&self, post_id: Uuid) -> Result<Option<ScheduledPost>, AppError>;

    async fn update_location_coordinates(
        &self,
        location_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, AppError>;

    /// Stamps `last_synced_at = now()`. `None` when no account has that id.
    async fn stamp_account_sync(&self, account_id: Uuid)
        -> Result<Option<SocialAccount>, AppError>;
}
