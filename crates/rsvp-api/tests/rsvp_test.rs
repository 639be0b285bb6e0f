//! Integration tests for RSVP submission and slot counts.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use rsvp_api::error::GENERIC_SERVER_ERROR;
use rsvp_booking::application::command_handlers::SLOT_FULL_MESSAGE;
use rsvp_booking::application::settings::{
    BookingSettings, ConsistencyMode, EmailDelivery, TableLayout,
};
use rsvp_booking::domain::commands::{INVALID_TIMESLOT_MESSAGE, MISSING_FIELDS_MESSAGE};
use rsvp_booking::domain::confirmation_email::EventDetails;
use rsvp_booking::domain::timeslot::{DEFAULT_TIMESLOTS, TimeslotCatalog};
use rsvp_core::error::DomainError;
use rsvp_core::mailer::DisabledMailer;
use rsvp_core::store::{Row, SheetStore};
use rsvp_test_support::{
    AppendFailingSheetStore, FailingMailer, InMemorySheetStore, RecordingMailer, row,
};
use serde_json::json;

/// Reads fail, appends land in memory.
#[derive(Default)]
struct ReadFailingSheetStore {
    inner: InMemorySheetStore,
}

#[async_trait]
impl SheetStore for ReadFailingSheetStore {
    async fn read_range(&self, _range: &str) -> Result<Vec<Row>, DomainError> {
        Err(DomainError::Infrastructure("read timed out".into()))
    }

    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> Result<(), DomainError> {
        self.inner.append_rows(range, rows).await
    }
}

/// Header plus two "18:00" rows and one "19:30" row. The last two share a
/// number, as left behind by an earlier concurrent pair of submissions.
fn seeded_rows() -> Vec<Row> {
    vec![
        common::header(),
        row(&["001", "Bob", "18:00", "2026-01-14T09:00:00.000Z", "bob@example.com"]),
        row(&["002", "Cy", "18:00", "2026-01-14T09:05:00.000Z", ""]),
        row(&["002", "Di", "19:30", "2026-01-14T09:05:00.010Z"]),
    ]
}

fn full_slot_rows(label: &str, count: u32) -> Vec<Row> {
    let mut rows = vec![common::header()];
    for n in 1..=count {
        rows.push(row(&[n.to_string().as_str(), "Guest", label]));
    }
    rows
}

fn settings_with_capacity(capacity: u32, email_delivery: EmailDelivery) -> BookingSettings {
    BookingSettings::new(
        TimeslotCatalog::uniform(&DEFAULT_TIMESLOTS, capacity).unwrap(),
        TableLayout::default(),
        EventDetails::default(),
        ConsistencyMode::Serialized,
        email_delivery,
    )
}

#[tokio::test]
async fn test_submit_assigns_next_number_and_appends_row() {
    // Arrange
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let app = common::build_test_app(store.clone(), Arc::new(RecordingMailer::new()));

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "Ada", "time": "18:00" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["number"], "003");
    assert_eq!(json["message"], "RSVP confirmed");

    let appended = store.appended();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].0, "Sheet1!A:E");
    assert_eq!(
        appended[0].1,
        vec![row(&["3", "Ada", "18:00", "2026-01-15T10:00:00.000Z", ""])]
    );
}

#[tokio::test]
async fn test_counts_reflect_seeded_rows() {
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let app = common::build_test_app(store, Arc::new(DisabledMailer));

    let (status, json) = common::get_json(app, "/api/rsvp/counts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["degraded"], false);
    assert_eq!(json["counts"], json!({ "18:00": 2, "19:30": 1 }));
}

#[tokio::test]
async fn test_counts_ignore_unknown_slots() {
    let store = Arc::new(InMemorySheetStore::new(vec![
        common::header(),
        row(&["1", "Eve", "21:00"]),
        row(&["2", "Fay", "19:30"]),
    ]));
    let app = common::build_test_app(store, Arc::new(DisabledMailer));

    let (_, json) = common::get_json(app, "/api/rsvp/counts").await;

    assert_eq!(json["counts"], json!({ "18:00": 0, "19:30": 1 }));
}

#[tokio::test]
async fn test_counts_fail_open_when_store_unreachable() {
    let app = common::build_test_app(
        Arc::new(ReadFailingSheetStore::default()),
        Arc::new(DisabledMailer),
    );

    let (status, json) = common::get_json(app, "/api/rsvp/counts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["degraded"], true);
    assert_eq!(json["counts"], json!({ "18:00": 0, "19:30": 0 }));
}

#[tokio::test]
async fn test_full_slot_is_rejected_without_append() {
    // Arrange
    let store = Arc::new(InMemorySheetStore::new(full_slot_rows("19:30", 56)));
    let app = common::build_test_app(store.clone(), Arc::new(RecordingMailer::new()));

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "Zed", "time": "19:30", "email": "zed@example.com" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], SLOT_FULL_MESSAGE);
    assert!(store.appended().is_empty());
}

#[tokio::test]
async fn test_other_slot_still_accepts_when_one_is_full() {
    let store = Arc::new(InMemorySheetStore::new(full_slot_rows("19:30", 56)));
    let app = common::build_test_app(store.clone(), Arc::new(DisabledMailer));

    let (status, json) =
        common::post_json(app, "/api/rsvp", &json!({ "name": "Zed", "time": "18:00" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["number"], "057");
    assert_eq!(store.appended().len(), 1);
}

#[tokio::test]
async fn test_capacity_comes_from_settings() {
    let store = Arc::new(InMemorySheetStore::new(full_slot_rows("18:00", 2)));
    let app = common::build_test_app_with_settings(
        settings_with_capacity(2, EmailDelivery::Inline),
        store.clone(),
        Arc::new(DisabledMailer),
    );

    let (status, json) =
        common::post_json(app, "/api/rsvp", &json!({ "name": "Ada", "time": "18:00" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], SLOT_FULL_MESSAGE);
    assert!(store.appended().is_empty());
}

#[tokio::test]
async fn test_missing_name_is_rejected_without_side_effects() {
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let mailer = Arc::new(RecordingMailer::new());
    let app = common::build_test_app(store.clone(), mailer.clone());

    let (status, json) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "   ", "time": "18:00", "email": "ada@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], MISSING_FIELDS_MESSAGE);
    assert!(store.appended().is_empty());
    assert!(mailer.sent_messages().is_empty());
}

#[tokio::test]
async fn test_unknown_timeslot_is_rejected() {
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let app = common::build_test_app(store.clone(), Arc::new(DisabledMailer));

    let (status, json) =
        common::post_json(app, "/api/rsvp", &json!({ "name": "Ada", "time": "20:00" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], INVALID_TIMESLOT_MESSAGE);
    assert!(store.appended().is_empty());
}

#[tokio::test]
async fn test_confirmation_email_is_sent_with_padded_number() {
    // Arrange
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let mailer = Arc::new(RecordingMailer::new());
    let app = common::build_test_app(store.clone(), mailer.clone());

    // Act
    let (status, _) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "Ada", "time": "19:30", "email": "ada@example.com" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let sent = mailer.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert!(sent[0].subject.contains("#003"));
    assert!(sent[0].html.contains("19:30"));
    assert_eq!(store.appended()[0].1[0][4], "ada@example.com");
}

#[tokio::test]
async fn test_email_failure_does_not_change_result() {
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let app = common::build_test_app(store.clone(), Arc::new(FailingMailer));

    let (status, json) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "Ada", "time": "18:00", "email": "ada@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["number"], "003");
    assert_eq!(store.appended().len(), 1);
}

#[tokio::test]
async fn test_background_email_delivery_still_confirms() {
    let store = Arc::new(InMemorySheetStore::new(seeded_rows()));
    let app = common::build_test_app_with_settings(
        settings_with_capacity(56, EmailDelivery::Background),
        store.clone(),
        Arc::new(FailingMailer),
    );

    let (status, json) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "Ada", "time": "18:00", "email": "ada@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["number"], "003");
}

#[tokio::test]
async fn test_unreadable_store_assigns_number_one() {
    // Reads fail open: zero counts and the first number, then the append proceeds.
    let store = Arc::new(ReadFailingSheetStore::default());
    let app = common::build_test_app(store.clone(), Arc::new(DisabledMailer));

    let (status, json) =
        common::post_json(app, "/api/rsvp", &json!({ "name": "Ada", "time": "18:00" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["number"], "001");
    assert_eq!(store.inner.appended().len(), 1);
}

#[tokio::test]
async fn test_append_failure_returns_generic_500() {
    let store = Arc::new(AppendFailingSheetStore::new(seeded_rows()));
    let mailer = Arc::new(RecordingMailer::new());
    let app = common::build_test_app(store, mailer.clone());

    let (status, json) = common::post_json(
        app,
        "/api/rsvp",
        &json!({ "name": "Ada", "time": "18:00", "email": "ada@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], GENERIC_SERVER_ERROR);
    assert!(!json.to_string().contains("quota"));
    assert!(mailer.sent_messages().is_empty());
}

#[tokio::test]
async fn test_sequential_submissions_get_increasing_numbers() {
    let store = Arc::new(InMemorySheetStore::new(vec![common::header()]));

    for expected in ["001", "002", "003"] {
        let app = common::build_test_app(store.clone(), Arc::new(DisabledMailer));
        let (status, json) =
            common::post_json(app, "/api/rsvp", &json!({ "name": "Ada", "time": "18:00" }))
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["number"], expected);
    }

    let app = common::build_test_app(store, Arc::new(DisabledMailer));
    let (_, json) = common::get_json(app, "/api/rsvp/counts").await;
    assert_eq!(json["counts"]["18:00"], 3);
}
