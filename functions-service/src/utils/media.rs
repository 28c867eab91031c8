//! Source image resolution for image edits.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use service_core::error::AppError;

/// Bytes behind `image_url`: a `data:` URL is decoded in place, an http(s)
/// URL is fetched with `client`.
pub async fn resolve_image(client: &reqwest::Client, image_url: &str) -> Result<Vec<u8>, AppError> {
    if let Some(data_url) = image_url.strip_prefix("data:") {
        return decode_data_url(data_url);
    }

    if !(image_url.starts_with("http://") || image_url.starts_with("https://")) {
        return Err(AppError::BadRequest(
            "imageUrl must be an http(s) or data: URL".to_string(),
        ));
    }

    tracing::debug!("Fetching source image");

    let response = client.get(image_url).send().await.map_err(|e| {
        tracing::error!(error = %e, "Source image download failed");
        AppError::Upstream("Failed to fetch source image".to_string())
    })?;

    if !response.status().is_success() {
        tracing::error!(status = response.status().as_u16(), "Source image download rejected");
        return Err(AppError::Upstream("Failed to fetch source image".to_string()));
    }

    let bytes = response.bytes().await.map_err(|e| {
        tracing::error!(error = %e, "Source image body unreadable");
        AppError::Upstream("Failed to fetch source image".to_string())
    })?;

    Ok(bytes.to_vec())
}

/// `[<mediatype>][;base64],<data>` with the `data:` scheme already removed.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, AppError> {
    let (meta, payload) = data_url
        .split_once(',')
        .ok_or_else(|| AppError::BadRequest("Malformed data URL".to_string()))?;

    if !meta.ends_with(";base64") {
        return Err(AppError::BadRequest(
            "Data URL must be base64-encoded".to_string(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("Data URL is not valid base64".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn decodes_base64_data_url() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(b"png"));
        let bytes = resolve_image(&reqwest::Client::new(), &url).await.unwrap();
        assert_eq!(bytes, b"png");
    }

    #[tokio::test]
    async fn rejects_non_base64_data_url() {
        let err = resolve_image(&reqwest::Client::new(), "data:text/plain,hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_scheme() {
        let err = resolve_image(&reqwest::Client::new(), "ftp://host/a.png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn downloads_http_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/source.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote".to_vec()))
            .mount(&server)
            .await;

        let url = format!("{}/source.png", server.uri());
        let bytes = resolve_image(&reqwest::Client::new(), &url).await.unwrap();
        assert_eq!(bytes, b"remote");
    }

    #[tokio::test]
    async fn failed_download_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.png", server.uri());
        let err = resolve_image(&reqwest::Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
