use serde::{Deserialize, Serialize};
use service_core::extract::{blank_as_none, blank_as_none_parsed};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "location is required"))]
    pub location: Option<String>,

    /// Row in `locations` to stamp with the coordinates.
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdateResult {
    pub success: bool,
    pub location_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
    /// False when no `locations` row had the given id.
    pub updated: bool,
}
