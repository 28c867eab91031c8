use crate::dtos::{HealthChecks, HealthResponse};
use crate::services::metrics::get_metrics;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// `None` when no datastore is configured.
async fn database_ok(state: &AppState) -> Option<bool> {
    let datastore = state.datastore.as_ref()?;
    Some(match datastore.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            false
        }
    })
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, status, database) = match database_ok(&state).await {
        Some(true) => (StatusCode::OK, "ok", "ok"),
        Some(false) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "error"),
        None => (StatusCode::OK, "ok", "not_configured"),
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            service: state.service_name.clone(),
            version: env!("CARGO_PKG_VERSION"),
            checks: HealthChecks { database },
        }),
    )
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match database_ok(&state).await {
        Some(false) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Function not found".to_string())
}
