use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use mediqr_data::database::DatabasePool;
use mediqr_domain::health::{
    ComponentStatus as DomainComponentStatus, HealthService, HealthServiceTrait, SystemStatus,
};

/// Health service type for dependency injection
pub type HealthServiceHandle = Arc<dyn HealthServiceTrait + Send + Sync>;

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", "degraded" or "error"
    pub status: String,
    /// Application version from the Cargo manifest
    pub version: String,
    /// Unix timestamp of the response
    pub timestamp: u64,
    /// Seconds since the server started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub components: ComponentStatus,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub patient_store: ComponentHealthStatus,
    pub api: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// "ok", "degraded" or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time for uptime reporting. Later calls are ignored.
pub fn initialize_server_start_time() {
    let _ = SERVER_START_TIME.set(unix_now());
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(Extension(health_service): Extension<HealthServiceHandle>) -> impl IntoResponse {
    debug!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start| now.saturating_sub(start));

    let system_health = health_service.get_system_health().await;

    let store = system_health.components.get("patient_store");
    let components = ComponentStatus {
        patient_store: ComponentHealthStatus {
            status: map_component_status(store.map_or(DomainComponentStatus::Healthy, |c| c.status)).to_string(),
            message: store.and_then(|c| c.details.clone()),
        },
        api: ComponentHealthStatus {
            status: "ok".to_string(),
            message: None,
        },
    };

    let (status, code) = match system_health.status {
        SystemStatus::Healthy => ("ok", StatusCode::OK),
        SystemStatus::Degraded => ("degraded", StatusCode::SERVICE_UNAVAILABLE),
        SystemStatus::Unhealthy => ("error", StatusCode::INTERNAL_SERVER_ERROR),
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components,
    };

    (code, Json(response))
}

fn map_component_status(status: DomainComponentStatus) -> &'static str {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
}

/// Factory function to create a health service
pub fn create_health_service(pool: Option<DatabasePool>) -> HealthServiceHandle {
    Arc::new(HealthService::new(pool))
}
