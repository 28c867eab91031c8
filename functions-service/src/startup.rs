use crate::config::{FunctionsConfig, StorageBackend};
use crate::handlers;
use crate::services::metrics::init_metrics;
use crate::services::providers::mapbox::MapboxGeocoder;
use crate::services::providers::openai::OpenAiProvider;
use crate::services::providers::{CompletionProvider, GeocodingProvider, ImageProvider};
use crate::services::{storage, Datastore, ObjectStorage, PgDatastore};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors::cors_middleware, metrics::metrics_middleware, tracing::make_request_span,
    tracing::request_id_middleware,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Collaborators shared by every function. Each one is optional; a function
/// whose collaborator is missing answers "not configured".
#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub datastore: Option<Arc<dyn Datastore>>,
    pub completion: Option<Arc<dyn CompletionProvider>>,
    pub images: Option<Arc<dyn ImageProvider>>,
    pub geocoder: Option<Arc<dyn GeocodingProvider>>,
    pub storage: Option<Arc<dyn ObjectStorage>>,
    /// Variable reported when `storage` is absent.
    pub storage_credential: &'static str,
    /// Plain client for fetching source images.
    pub http: reqwest::Client,
    /// Directory served under `/storage` when the local backend is active.
    pub local_storage_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            datastore: None,
            completion: None,
            images: None,
            geocoder: None,
            storage: None,
            storage_credential: "STORAGE_SERVICE_KEY",
            http: reqwest::Client::new(),
            local_storage_dir: None,
        }
    }

    pub fn with_datastore(mut self, datastore: Arc<dyn Datastore>) -> Self {
        self.datastore = Some(datastore);
        self
    }

    pub fn with_completion(mut self, completion: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageProvider>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn GeocodingProvider>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn ObjectStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn datastore(&self) -> Result<&dyn Datastore, AppError> {
        self.datastore
            .as_deref()
            .ok_or_else(|| AppError::not_configured("DATABASE_URL"))
    }

    pub fn completion(&self) -> Result<&dyn CompletionProvider, AppError> {
        self.completion
            .as_deref()
            .ok_or_else(|| AppError::not_configured("OPENAI_API_KEY"))
    }

    pub fn images(&self) -> Result<&dyn ImageProvider, AppError> {
        self.images
            .as_deref()
            .ok_or_else(|| AppError::not_configured("OPENAI_API_KEY"))
    }

    pub fn geocoder(&self) -> Result<&dyn GeocodingProvider, AppError> {
        self.geocoder
            .as_deref()
            .ok_or_else(|| AppError::not_configured("MAPBOX_ACCESS_TOKEN"))
    }

    pub fn storage(&self) -> Result<&dyn ObjectStorage, AppError> {
        self.storage
            .as_deref()
            .ok_or_else(|| AppError::not_configured(self.storage_credential))
    }

    /// Wire every collaborator whose credentials are present in `config`.
    pub async fn from_config(config: &FunctionsConfig) -> Result<Self, AppError> {
        let mut state = AppState::new(config.service_name.clone());

        if let Some(db) = PgDatastore::from_config(&config.database)? {
            if config.database.run_migrations {
                db.run_migrations().await?;
            }
            state = state.with_datastore(Arc::new(db));
        } else {
            tracing::warn!("DATABASE_URL not set; record functions are disabled");
        }

        let openai = OpenAiProvider::from_config(&config.openai)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        if let Some(openai) = openai {
            let openai = Arc::new(openai);
            state = state.with_completion(openai.clone()).with_images(openai);
        } else {
            tracing::warn!("OPENAI_API_KEY not set; completion and image functions are disabled");
        }

        let geocoder = MapboxGeocoder::from_config(&config.mapbox)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        if let Some(geocoder) = geocoder {
            state = state.with_geocoder(Arc::new(geocoder));
        } else {
            tracing::warn!("MAPBOX_ACCESS_TOKEN not set; geocoding is disabled");
        }

        match storage::from_config(&config.storage).await? {
            Some(store) => state.storage = Some(Arc::from(store)),
            None => {
                if let Some(name) = config.storage.missing_credential() {
                    state.storage_credential = name;
                }
                tracing::warn!(
                    "{} not set; image functions are disabled",
                    state.storage_credential
                );
            }
        }
        if config.storage.backend == StorageBackend::Local {
            state.local_storage_dir = Some(PathBuf::from(&config.storage.local_path));
        }

        state.http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(state)
    }
}

/// Request body ceiling for the function routes. `data:` sources for
/// edit-image carry a base64 image inline.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let functions = Router::new()
        .route("/generate-content", any(handlers::content::generate_content))
        .route(
            "/suggest-comment-response",
            any(handlers::content::suggest_comment_response),
        )
        .route(
            "/generate-search-queries",
            any(handlers::content::generate_search_queries),
        )
        .route(
            "/generate-slide-outline",
            any(handlers::content::generate_slide_outline),
        )
        .route("/generate-image", any(handlers::images::generate_image))
        .route("/edit-image", any(handlers::images::edit_image))
        .route("/geocode-location", any(handlers::geocode::geocode_location))
        .route("/log-engagement", any(handlers::records::log_engagement))
        .route("/schedule-post", any(handlers::records::schedule_post))
        .route("/publish-post", any(handlers::records::publish_post))
        .route("/sync-account", any(handlers::records::sync_account))
        .route("/upsert-social-user", any(handlers::users::upsert_social_user))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .nest("/functions/v1", functions);

    if let Some(dir) = &state.local_storage_dir {
        app = app.nest_service("/storage", ServeDir::new(dir));
    }

    app.fallback(handlers::health::not_found)
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| make_request_span(request)),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(cors_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: FunctionsConfig) -> Result<Self, AppError> {
        init_metrics()?;

        let state = AppState::from_config(&config).await?;
        let router = build_router(state);

        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
