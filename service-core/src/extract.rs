//! Request body extractors that reject with [`AppError`] instead of axum's
//! plain-text rejections, so every failure leaves as a JSON body.

use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::fmt::Display;
use std::str::FromStr;
use validator::Validate;

/// JSON body parsed regardless of the request's `Content-Type`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {}", e)))?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        Ok(JsonBody(value))
    }
}

/// [`JsonBody`] that also runs the payload's `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Deserializes an optional string, treating blank values as absent so that
/// `#[validate(required)]` also rejects `""` and `"   "`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Like [`blank_as_none`], then parses what is left with `FromStr`. Used for
/// optional ids, where clients send `""` for "no id".
pub fn blank_as_none_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    blank_as_none(deserializer)?
        .map(|s| s.trim().parse().map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[serde(default, deserialize_with = "blank_as_none")]
        #[validate(required(message = "name is required"))]
        name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct WithId {
        #[serde(default, deserialize_with = "blank_as_none_parsed")]
        id: Option<uuid::Uuid>,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_body_without_content_type() {
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(request(r#"{"name":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected() {
        let err = ValidatedJson::<Payload>::from_request(request(r#"{"name":"   "}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = JsonBody::<Payload>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn blank_id_is_absent() {
        let parsed: WithId = serde_json::from_str(r#"{"id":""}"#).unwrap();
        assert_eq!(parsed.id, None);
        let parsed: WithId = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.id, None);
        let parsed: WithId = serde_json::from_str(r#"{"id":null}"#).unwrap();
        assert_eq!(parsed.id, None);
    }

    #[test]
    fn id_is_parsed_or_rejected() {
        let parsed: WithId =
            serde_json::from_str(r#"{"id":" 7b0c3c5e-0f4e-4d0f-9a57-1f9a2c3d4e5f "}"#).unwrap();
        assert!(parsed.id.is_some());
        assert!(serde_json::from_str::<WithId>(r#"{"id":"not-a-uuid"}"#).is_err());
    }
}
