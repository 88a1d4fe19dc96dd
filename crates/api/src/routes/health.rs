use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the engagement database is reachable.
    pub db_healthy: bool,
}

#[derive(Serialize)]
pub struct ServiceBanner {
    pub service: &'static str,
    pub version: &'static str,
}

/// GET / -- identifies the service.
async fn banner() -> Json<ServiceBanner> {
    Json(ServiceBanner {
        service: "setuphub-visualizations",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.engagement.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Engagement storage health check failed");
            false
        }
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount service routes at root level.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}
