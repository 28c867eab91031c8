//! Mapbox forward geocoding.

use super::{error_from_response, GeocodeMatch, GeocodingProvider, ProviderError};
use crate::config::MapboxConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

pub struct MapboxGeocoder {
    client: Client,
    access_token: Secret<String>,
    base_url: String,
}

impl MapboxGeocoder {
    pub fn new(base_url: &str, access_token: Secret<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &MapboxConfig) -> Result<Option<Self>, ProviderError> {
        config
            .access_token
            .clone()
            .map(|token| Self::new(&config.base_url, token))
            .transpose()
    }
}

#[async_trait]
impl GeocodingProvider for MapboxGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ProviderError> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.base_url,
            urlencoding::encode(query)
        );

        tracing::debug!(query_len = query.len(), "Sending request to Mapbox geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.access_token.expose_secret().as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response("mapbox", response).await);
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let Some(feature) = body.features.into_iter().next() else {
            return Ok(None);
        };

        // Mapbox orders coordinates as [longitude, latitude].
        match feature.center.as_slice() {
            [longitude, latitude, ..] => Ok(Some(GeocodeMatch {
                latitude: *latitude,
                longitude: *longitude,
                place_name: feature.place_name,
            })),
            _ => Err(ProviderError::InvalidResponse(
                "Feature center is missing coordinates".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    center: Vec<f64>,
    #[serde(default)]
    place_name: String,
}
