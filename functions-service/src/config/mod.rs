use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionsConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub openai: OpenAiConfig,
    pub mapbox: MapboxConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

/// Relational datastore. `url` absent means every record-writing function
/// answers "not configured".
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<Secret<String>>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// Completion and image generation share one key.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub image_edit_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapboxConfig {
    pub access_token: Option<Secret<String>>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base URL of the storage REST API (http backend).
    pub url: Option<String>,
    pub service_key: Option<Secret<String>>,
    pub bucket: String,
    /// Directory for the local backend.
    pub local_path: String,
    /// URL prefix under which the local backend's files are served.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Http,
    Local,
}

impl StorageConfig {
    /// First variable the http backend needs but lacks.
    pub fn missing_credential(&self) -> Option<&'static str> {
        match self.backend {
            StorageBackend::Local => None,
            StorageBackend::Http if self.url.is_none() => Some("STORAGE_URL"),
            StorageBackend::Http if self.service_key.is_none() => Some("STORAGE_SERVICE_KEY"),
            StorageBackend::Http => None,
        }
    }
}

impl FunctionsConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let environment: Environment = get_env("ENVIRONMENT", Some("dev"))?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(FunctionsConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("functions-service"))?,
            log_level: get_env("LOG_LEVEL", Some("info"))?,
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            database: DatabaseConfig {
                url: optional_env("DATABASE_URL").map(Secret::new),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 0)?,
                run_migrations: parse_env("RUN_MIGRATIONS", false)?,
            },
            openai: OpenAiConfig {
                api_key: optional_env("OPENAI_API_KEY").map(Secret::new),
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL))?,
                text_model: get_env("OPENAI_TEXT_MODEL", Some("gpt-4o-mini"))?,
                image_model: get_env("OPENAI_IMAGE_MODEL", Some("dall-e-3"))?,
                image_edit_model: get_env("OPENAI_IMAGE_EDIT_MODEL", Some("dall-e-2"))?,
            },
            mapbox: MapboxConfig {
                access_token: optional_env("MAPBOX_ACCESS_TOKEN").map(Secret::new),
                base_url: get_env("MAPBOX_BASE_URL", Some(DEFAULT_MAPBOX_BASE_URL))?,
            },
            storage: StorageConfig {
                backend: get_env("STORAGE_BACKEND", Some("http"))?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                url: optional_env("STORAGE_URL"),
                service_key: optional_env("STORAGE_SERVICE_KEY").map(Secret::new),
                bucket: get_env("STORAGE_BUCKET", Some("generated-images"))?,
                local_path: get_env("STORAGE_LOCAL_PATH", Some("storage"))?,
                public_base_url: get_env(
                    "STORAGE_PUBLIC_BASE_URL",
                    Some("http://localhost:8080/storage"),
                )?,
            },
        })
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" | "test" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(StorageBackend::Http),
            "local" => Ok(StorageBackend::Local),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

/// Credentials are optional at startup; empty values count as unset.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        None => Ok(default),
    }
}
