//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use rsvp_booking::application::settings::BookingSettings;
use rsvp_core::clock::Clock;
use rsvp_core::mailer::Mailer;
use rsvp_core::store::{Row, SheetStore};
use rsvp_test_support::{FixedClock, row};
use tower::ServiceExt;

use rsvp_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// The header row every seeded table starts with.
pub fn header() -> Row {
    row(&["Number", "Name", "Time", "Timestamp", "Email"])
}

/// Build the full app router with default settings. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app(store: Arc<dyn SheetStore>, mailer: Arc<dyn Mailer>) -> Router {
    build_test_app_with_settings(BookingSettings::default(), store, mailer)
}

/// Build the full app router with custom booking settings.
pub fn build_test_app_with_settings(
    settings: BookingSettings,
    store: Arc<dyn SheetStore>,
    mailer: Arc<dyn Mailer>,
) -> Router {
    let app_state = AppState::new(settings, fixed_clock(), store, mailer);
    rsvp_api::app(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
