use crate::config::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::fs;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Publicly reachable URL of an uploaded object.
    fn public_url(&self, key: &str) -> String;
}

/// Build the configured backend. `None` when the http backend lacks
/// `STORAGE_URL` or `STORAGE_SERVICE_KEY`.
pub async fn from_config(config: &StorageConfig) -> Result<Option<Box<dyn ObjectStorage>>, AppError> {
    match config.backend {
        StorageBackend::Local => {
            let storage = LocalStorage::new(&config.local_path, &config.public_base_url).await?;
            Ok(Some(Box::new(storage)))
        }
        StorageBackend::Http => match (&config.url, &config.service_key) {
            (Some(url), Some(key)) => {
                let storage = HttpObjectStorage::new(url, key.clone(), &config.bucket)?;
                Ok(Some(Box::new(storage)))
            }
            _ => Ok(None),
        },
    }
}

/// Bucket-based storage REST API (`/storage/v1/object/{bucket}/{key}`).
pub struct HttpObjectStorage {
    client: Client,
    base_url: String,
    service_key: Secret<String>,
    bucket: String,
}

impl HttpObjectStorage {
    pub fn new(base_url: &str, service_key: Secret<String>, bucket: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key);
        let secret = self.service_key.expose_secret();

        let response = self
            .client
            .post(&url)
            .bearer_auth(secret)
            .header("apikey", secret.as_str())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Storage upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalError(anyhow::anyhow!(
                "Storage upload returned {}: {}",
                status,
                body
            )));
        }

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

/// Files on local disk, served by the router under `/storage`.
pub struct LocalStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>, public_base_url: &str) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MockStorage {
    failing: bool,
    objects: Mutex<Vec<(String, usize)>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Keys and sizes of every uploaded object, in upload order.
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.objects
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::InternalError(anyhow::anyhow!("mock storage unavailable")));
        }
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Mock storage mutex poisoned: {}", e)))?;
        objects.push((key.to_string(), data.len()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.test/generated-images/{}", key)
    }
}
