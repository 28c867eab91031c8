use crate::models::{NewSocialUser, UserLink};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::extract::{blank_as_none, blank_as_none_parsed};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertSocialUserRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "username is required"))]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub display_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub bio: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub source: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub company_id: Option<Uuid>,

    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub person_id: Option<Uuid>,
}

impl UpsertSocialUserRequest {
    /// Converts into the upsert input. A user links to a company or a person,
    /// never both.
    pub fn into_new_user(self) -> Result<NewSocialUser, AppError> {
        let link = match (self.company_id, self.person_id) {
            (Some(_), Some(_)) => {
                return Err(AppError::BadRequest(
                    "Provide at most one of company_id or person_id".to_string(),
                ))
            }
            (Some(id), None) => Some(UserLink::Company(id)),
            (None, Some(id)) => Some(UserLink::Person(id)),
            (None, None) => None,
        };

        let mut user = NewSocialUser::new(self.username.unwrap_or_default());
        if let Some(source) = self.source {
            user = user.with_source(source);
        }
        user.display_name = self.display_name;
        user.bio = self.bio;
        user.location = self.location;
        user.link = link;
        Ok(user)
    }
}

#[derive(Debug, Serialize)]
pub struct UpsertSocialUserResponse {
    pub user_id: Uuid,
}
