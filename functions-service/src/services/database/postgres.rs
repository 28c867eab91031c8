//! PostgreSQL datastore backed by sqlx.

use super::Datastore;
use crate::config::DatabaseConfig;
use crate::models::{
    CreateEngagementAction, CreateScheduledPost, EngagementAction, Location, NewSocialUser,
    PostStatus, ScheduledPost, SocialAccount,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const SCHEDULED_POST_COLUMNS: &str = "id, account_id, content_id, scheduled_for, payload, status, published_at, created_at, updated_at";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    /// Build a lazily-connecting pool so the service can start while the
    /// database is still coming up.
    pub fn connect_lazy(database_url: &str, config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect_lazy(database_url)
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Invalid database URL: {}", e)))?;

        info!(
            max_connections = config.max_connections,
            "PostgreSQL pool configured"
        );

        Ok(Self { pool })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Option<Self>, AppError> {
        config
            .url
            .as_ref()
            .map(|url| Self::connect_lazy(url.expose_secret(), config))
            .transpose()
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn upsert_social_user(&self, user: &NewSocialUser) -> Result<Uuid, AppError> {
        let company_id = user.link.and_then(|l| l.company_id());
        let person_id = user.link.and_then(|l| l.person_id());

        sqlx::query_scalar::<_, Uuid>("SELECT upsert_social_user($1, $2, $3, $4, $5, $6, $7)")
            .bind(&user.username)
            .bind(&user.display_name)
            .bind(&user.bio)
            .bind(&user.location)
            .bind(&user.source)
            .bind(company_id)
            .bind(person_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to upsert social user: {}", e))
            })
    }

    #[instrument(skip(self, input), fields(account_id = %input.account_id))]
    async fn insert_engagement_action(
        &self,
        input: &CreateEngagementAction,
    ) -> Result<EngagementAction, AppError> {
        let action = sqlx::query_as::<_, EngagementAction>(
            r#"
            INSERT INTO engagement_actions (id, account_id, action_type, target_post_url, target_user_id, target_username, comment_text, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, account_id, action_type, target_post_url, target_user_id, target_username, comment_text, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.account_id)
        .bind(&input.action_type)
        .bind(&input.target_post_url)
        .bind(input.target_user_id)
        .bind(&input.target_username)
        .bind(&input.comment_text)
        .bind(input.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to log engagement action: {}", e))
        })?;

        info!(action_id = %action.id, action_type = %action.action_type, "Engagement action logged");

        Ok(action)
    }

    #[instrument(skip(self, input), fields(account_id = %input.account_id))]
    async fn insert_scheduled_post(
        &self,
        input: &CreateScheduledPost,
    ) -> Result<ScheduledPost, AppError> {
        let sql = format!(
            r#"
            INSERT INTO scheduled_posts (id, account_id, content_id, scheduled_for, payload, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SCHEDULED_POST_COLUMNS
        );

        let post = sqlx::query_as::<_, ScheduledPost>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.account_id)
            .bind(input.content_id)
            .bind(input.scheduled_for)
            .bind(&input.payload)
            .bind(input.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to schedule post: {}", e))
            })?;

        info!(post_id = %post.id, scheduled_for = %post.scheduled_for, "Post scheduled");

        Ok(post)
    }

    #[instrument(skip(self))]
    async fn mark_post_published(&self, post_id: Uuid) -> Result<Option<ScheduledPost>, AppError> {
        let sql = format!(
            r#"
            UPDATE scheduled_posts
            SET status = $2, published_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SCHEDULED_POST_COLUMNS
        );

        sqlx::query_as::<_, ScheduledPost>(&sql)
            .bind(post_id)
            .bind(PostStatus::Published.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to publish post: {}", e)))
    }

    #[instrument(skip(self))]
    async fn update_location_coordinates(
        &self,
        location_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, AppError> {
        sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET latitude = $2, longitude = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, latitude, longitude, updated_at
            "#,
        )
        .bind(location_id)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update location: {}", e))
        })
    }

    #[instrument(skip(self))]
    async fn stamp_account_sync(
        &self,
        account_id: Uuid,
    ) -> Result<Option<SocialAccount>, AppError> {
        sqlx::query_as::<_, SocialAccount>(
            r#"
            UPDATE social_accounts
            SET last_synced_at = NOW()
            WHERE id = $1
            RETURNING id, platform, handle, last_synced_at, created_at
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to stamp account sync: {}", e))
        })
    }
}
