//! RSVP service — HTTP API.
//!
//! Exposes discovery, health, slot counts and RSVP submission over axum,
//! backed by a Google Sheets record store and a Brevo mailer.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the full application router. Used by `main.rs` and the
/// integration tests so both serve the same route table.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::rsvp::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
