mod common;

use axum::http::StatusCode;
use common::TestApp;
use functions_service::services::providers::mock::MockGeocodingProvider;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn geocode_without_location_id_returns_coordinates() {
    let app = TestApp::new();

    let response = app.call("geocode-location", json!({ "location": "Berlin" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "latitude": 52.52, "longitude": 13.405, "placeName": "Berlin, Germany" })
    );
}

#[tokio::test]
async fn blank_location_id_returns_coordinates_only() {
    let app = TestApp::new();

    let response = app
        .call("geocode-location", json!({ "location": "Berlin", "locationId": "" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "latitude": 52.52, "longitude": 13.405, "placeName": "Berlin, Germany" })
    );
}

#[tokio::test]
async fn geocode_with_location_id_updates_row() {
    let app = TestApp::new();
    let location_id = app.datastore.seed_location("Berlin");

    let response = app
        .call(
            "geocode-location",
            json!({ "location": "Berlin", "locationId": location_id }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({
            "success": true,
            "locationId": location_id,
            "latitude": 52.52,
            "longitude": 13.405,
            "placeName": "Berlin, Germany",
            "updated": true
        })
    );

    let stored = app.datastore.location(location_id).unwrap();
    assert_eq!(stored.latitude, Some(52.52));
    assert_eq!(stored.longitude, Some(13.405));
}

#[tokio::test]
async fn unknown_location_id_reports_not_updated() {
    let app = TestApp::new();

    let response = app
        .call(
            "geocode-location",
            json!({ "location": "Berlin", "locationId": Uuid::new_v4() }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["updated"], false);
}

#[tokio::test]
async fn zero_matches_is_not_found() {
    let app = TestApp::builder()
        .geocoder(MockGeocodingProvider::empty())
        .build();

    let response = app.call("geocode-location", json!({ "location": "Atlantis" })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "error": "Location not found" }));
}

#[tokio::test]
async fn location_is_required() {
    let app = TestApp::new();

    let response = app.call("geocode-location", json!({ "location": "" })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "location is required");
}

#[tokio::test]
async fn update_failure_is_server_error() {
    let app = TestApp::builder()
        .datastore(functions_service::services::MockDatastore::failing())
        .build();

    let response = app
        .call(
            "geocode-location",
            json!({ "location": "Berlin", "locationId": Uuid::new_v4() }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn geocoder_failure_and_missing_token() {
    let failing = TestApp::builder()
        .geocoder(MockGeocodingProvider::failing("Not Authorized - Invalid Token"))
        .build();
    let response = failing.call("geocode-location", json!({ "location": "Paris" })).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Not Authorized - Invalid Token");

    let unconfigured = TestApp::builder().without_geocoder().build();
    let response = unconfigured.call("geocode-location", json!({ "location": "Paris" })).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "MAPBOX_ACCESS_TOKEN is not configured");
}
