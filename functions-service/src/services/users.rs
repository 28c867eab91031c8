//! Social user normalization and upsert.

use super::database::Datastore;
use crate::models::NewSocialUser;
use uuid::Uuid;

/// Canonical form of a handle: every leading `@` and whitespace run removed,
/// plus trailing whitespace. Idempotent.
pub fn normalize_username(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c == '@' || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// Insert-or-return the user row for `user.username`.
///
/// Never fails: an empty handle or a datastore error yields `None`, the
/// latter logged at error level.
pub async fn upsert_social_user(datastore: &dyn Datastore, user: NewSocialUser) -> Option<Uuid> {
    let username = normalize_username(&user.username);
    if username.is_empty() {
        tracing::debug!("Skipping social user upsert for empty username");
        return None;
    }

    let user = NewSocialUser { username, ..user };
    match datastore.upsert_social_user(&user).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::error!(username = %user.username, error = %e, "Failed to upsert social user");
            None
        }
    }
}
