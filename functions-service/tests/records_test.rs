mod common;

use axum::http::StatusCode;
use common::TestApp;
use functions_service::services::MockDatastore;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn log_engagement_requires_account_id() {
    let app = TestApp::new();

    let response = app
        .call("log-engagement", json!({ "action_type": "like" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "account_id is required");
    assert!(app.datastore.engagement_actions().is_empty());
}

#[tokio::test]
async fn log_engagement_defaults_to_queued() {
    let app = TestApp::new();
    let account_id = Uuid::new_v4();

    let response = app
        .call(
            "log-engagement",
            json!({
                "account_id": account_id,
                "action_type": "comment",
                "target_post_url": "https://www.linkedin.com/feed/update/1",
                "comment_text": "Great insight!"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["action"]["status"], "queued");
    assert_eq!(body["action"]["account_id"], account_id.to_string());
    assert_eq!(body["action"]["target_user_id"], serde_json::Value::Null);

    let rows = app.datastore.engagement_actions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "queued");
    assert_eq!(rows[0].comment_text.as_deref(), Some("Great insight!"));
}

#[tokio::test]
async fn log_engagement_links_target_user() {
    let app = TestApp::new();

    let response = app
        .call(
            "log-engagement",
            json!({
                "account_id": Uuid::new_v4(),
                "action_type": "follow",
                "target_username": "@ferris ",
                "status": "completed"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let user_id = app.datastore.user_id("ferris").expect("user was upserted");
    let body = response.json();
    assert_eq!(body["action"]["target_user_id"], user_id.to_string());
    assert_eq!(body["action"]["status"], "completed");
}

#[tokio::test]
async fn log_engagement_rejects_unknown_status() {
    let app = TestApp::new();

    let response = app
        .call(
            "log-engagement",
            json!({ "account_id": Uuid::new_v4(), "action_type": "like", "status": "maybe" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn schedule_post_defaults_to_pending() {
    let app = TestApp::new();
    let account_id = Uuid::new_v4();

    let response = app
        .call(
            "schedule-post",
            json!({
                "account_id": account_id,
                "scheduled_for": "2030-01-15T09:00:00Z",
                "payload": { "text": "Hello" }
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["status"], "pending");
    assert_eq!(body["post"]["payload"], json!({ "text": "Hello" }));

    let rows = app.datastore.scheduled_posts();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "pending");
    assert_eq!(rows[0].scheduled_for.to_rfc3339(), "2030-01-15T09:00:00+00:00");
}

#[tokio::test]
async fn schedule_post_defaults_payload_to_empty_object() {
    let app = TestApp::new();

    let body = app
        .call(
            "schedule-post",
            json!({ "account_id": Uuid::new_v4(), "scheduled_for": "2030-01-15T09:00:00Z" }),
        )
        .await
        .json();

    assert_eq!(body["post"]["payload"], json!({}));
}

#[tokio::test]
async fn schedule_post_rejects_bad_timestamp() {
    let app = TestApp::new();

    let response = app
        .call(
            "schedule-post",
            json!({ "account_id": Uuid::new_v4(), "scheduled_for": "next tuesday" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.datastore.scheduled_posts().is_empty());
}

#[tokio::test]
async fn schedule_post_requires_scheduled_for() {
    let app = TestApp::new();

    let response = app
        .call("schedule-post", json!({ "account_id": Uuid::new_v4() }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "scheduled_for is required");
}

#[tokio::test]
async fn publish_post_flips_existing_row() {
    let app = TestApp::new();

    let scheduled = app
        .call(
            "schedule-post",
            json!({ "account_id": Uuid::new_v4(), "scheduled_for": "2030-01-15T09:00:00Z" }),
        )
        .await
        .json();
    let post_id = scheduled["post"]["id"].clone();

    let response = app.call("publish-post", json!({ "post_id": post_id })).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["post"]["id"], post_id);
    assert_eq!(body["post"]["status"], "published");
    assert!(body["post"]["published_at"].is_string());
    assert_eq!(app.datastore.scheduled_posts().len(), 1);
}

#[tokio::test]
async fn publish_post_without_id_creates_and_publishes() {
    let app = TestApp::new();
    let account_id = Uuid::new_v4();

    let response = app.call("publish-post", json!({ "account_id": account_id })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["post"]["status"], "published");

    let rows = app.datastore.scheduled_posts();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].account_id, account_id);
}

#[tokio::test]
async fn publish_post_with_blank_id_creates_and_publishes() {
    let app = TestApp::new();
    let account_id = Uuid::new_v4();

    let response = app
        .call("publish-post", json!({ "post_id": "", "account_id": account_id }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["post"]["status"], "published");
    assert_eq!(app.datastore.scheduled_posts().len(), 1);
}

#[tokio::test]
async fn blank_account_id_is_reported_as_missing() {
    let app = TestApp::new();

    let response = app.call("sync-account", json!({ "account_id": "  " })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "account_id is required");
}

#[tokio::test]
async fn publish_post_errors() {
    let app = TestApp::new();

    let missing = app.call("publish-post", json!({ "post_id": Uuid::new_v4() })).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), "Scheduled post not found");

    let empty = app.call("publish-post", json!({})).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.error(), "account_id is required");
}

#[tokio::test]
async fn sync_account_stamps_last_synced_at() {
    let app = TestApp::new();
    let account_id = app.datastore.seed_account("linkedin");

    let response = app.call("sync-account", json!({ "account_id": account_id })).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["account_id"], account_id.to_string());
    assert!(body["last_synced_at"].is_string());
}

#[tokio::test]
async fn sync_account_unknown_is_not_found() {
    let app = TestApp::new();

    let response = app.call("sync-account", json!({ "account_id": Uuid::new_v4() })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Account not found");
}

#[tokio::test]
async fn upsert_social_user_is_idempotent_on_normalized_name() {
    let app = TestApp::new();

    let first = app.call("upsert-social-user", json!({ "username": "@Ferris " })).await;
    let second = app
        .call(
            "upsert-social-user",
            json!({ "username": "Ferris", "company_id": Uuid::new_v4() }),
        )
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json()["user_id"], second.json()["user_id"]);
    assert!(app.datastore.user_id("Ferris").is_some());
}

#[tokio::test]
async fn upsert_social_user_rejects_blank_handle() {
    let app = TestApp::new();

    let blank = app.call("upsert-social-user", json!({ "username": "  " })).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let only_at = app.call("upsert-social-user", json!({ "username": "@" })).await;
    assert_eq!(only_at.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(only_at.error(), "Failed to upsert social user");
}

#[tokio::test]
async fn upsert_social_user_rejects_two_links() {
    let app = TestApp::new();

    let response = app
        .call(
            "upsert-social-user",
            json!({ "username": "ferris", "company_id": Uuid::new_v4(), "person_id": Uuid::new_v4() }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn record_functions_need_a_datastore() {
    let app = TestApp::builder().without_datastore().build();

    let response = app
        .call(
            "log-engagement",
            json!({ "account_id": Uuid::new_v4(), "action_type": "like" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "DATABASE_URL is not configured");
}

#[tokio::test]
async fn datastore_failure_is_server_error() {
    let app = TestApp::builder().datastore(MockDatastore::failing()).build();

    let response = app
        .call(
            "schedule-post",
            json!({ "account_id": Uuid::new_v4(), "scheduled_for": "2030-01-15T09:00:00Z" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Database error");
}
