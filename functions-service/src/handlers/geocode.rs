use crate::dtos::{GeocodeRequest, GeocodeResult, LocationUpdateResult};
use crate::services::metrics::record_upstream;
use crate::startup::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

/// Resolve free text to coordinates and, given a `locationId`, store them on
/// that `locations` row.
#[axum::debug_handler]
pub async fn geocode_location(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GeocodeRequest>,
) -> Result<Response, AppError> {
    let geocoder = state.geocoder()?;
    let location = req.location.unwrap_or_default();

    let result = geocoder.geocode(&location).await;
    record_upstream("mapbox", result.is_ok());
    let found = result
        .map_err(|e| e.into_app_error("Failed to geocode location"))?
        .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;

    let Some(location_id) = req.location_id else {
        return Ok(Json(GeocodeResult {
            latitude: found.latitude,
            longitude: found.longitude,
            place_name: found.place_name,
        })
        .into_response());
    };

    let updated = state
        .datastore()?
        .update_location_coordinates(location_id, found.latitude, found.longitude)
        .await?
        .is_some();

    if !updated {
        tracing::warn!(%location_id, "No location row to update");
    }

    Ok(Json(LocationUpdateResult {
        success: true,
        location_id,
        latitude: found.latitude,
        longitude: found.longitude,
        place_name: found.place_name,
        updated,
    })
    .into_response())
}
