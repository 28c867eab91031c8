use crate::dtos::{UpsertSocialUserRequest, UpsertSocialUserResponse};
use crate::services::users;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

#[axum::debug_handler]
pub async fn upsert_social_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpsertSocialUserRequest>,
) -> Result<Json<UpsertSocialUserResponse>, AppError> {
    let datastore = state.datastore()?;
    let user = req.into_new_user()?;

    let user_id = users::upsert_social_user(datastore, user)
        .await
        .ok_or_else(|| AppError::Upstream("Failed to upsert social user".to_string()))?;

    Ok(Json(UpsertSocialUserResponse { user_id }))
}
