//! Discovery and health check endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Route listing returned by `GET /`.
#[derive(Serialize)]
pub struct EndpointsDescriptor {
    /// Liveness probe.
    pub health: &'static str,
    /// Per-slot occupancy.
    pub counts: &'static str,
    /// RSVP submission.
    pub submit: &'static str,
}

/// Discovery response.
#[derive(Serialize)]
pub struct RootResponse {
    /// Greeting.
    pub message: &'static str,
    /// Available routes.
    pub endpoints: EndpointsDescriptor,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Human-readable status.
    pub message: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// GET /
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "RSVP API is running",
        endpoints: EndpointsDescriptor {
            health: "GET /api/health",
            counts: "GET /api/rsvp/counts",
            submit: "POST /api/rsvp",
        },
    })
}

/// GET /api/health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Returns the discovery and health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
}
