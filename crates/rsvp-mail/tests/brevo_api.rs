//! Exercises `BrevoMailer` against an in-process stand-in for the Brevo API.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use rsvp_core::mailer::{EmailMessage, Mailer};
use rsvp_mail::{BrevoConfig, BrevoMailer};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct FakeBrevo {
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    reject: bool,
}

async fn send_email(
    State(fake): State<FakeBrevo>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    fake.received.lock().unwrap().push((api_key, body));
    if fake.reject {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "invalid_parameter", "message": "sender not verified" })),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({ "messageId": "<abc@smtp-relay>" })),
        )
    }
}

async fn spawn_fake(fake: FakeBrevo) -> (String, oneshot::Sender<()>) {
    let router = Router::new()
        .route("/v3/smtp/email", post(send_email))
        .with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    (format!("http://{addr}/v3/smtp/email"), shutdown_tx)
}

fn mailer(endpoint: &str) -> BrevoMailer {
    BrevoMailer::with_endpoint(
        reqwest::Client::builder().no_proxy().build().unwrap(),
        BrevoConfig {
            api_key: "xkeysib-test".into(),
            sender_email: "rsvp@example.com".into(),
            sender_name: Some("RSVP Desk".into()),
        },
        endpoint,
    )
}

fn message() -> EmailMessage {
    EmailMessage {
        to: "ada@example.com".into(),
        subject: "RSVP Confirmation #003".into(),
        html: "<p>#003</p>".into(),
    }
}

#[tokio::test]
async fn test_send_posts_message_with_api_key() {
    // Arrange
    let fake = FakeBrevo::default();
    let (endpoint, _shutdown) = spawn_fake(fake.clone()).await;

    // Act
    mailer(&endpoint).send(&message()).await.unwrap();

    // Assert
    let received = fake.received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    let (api_key, body) = &received[0];
    assert_eq!(api_key.as_deref(), Some("xkeysib-test"));
    assert_eq!(body["sender"]["email"], "rsvp@example.com");
    assert_eq!(body["sender"]["name"], "RSVP Desk");
    assert_eq!(body["to"][0]["email"], "ada@example.com");
    assert_eq!(body["subject"], "RSVP Confirmation #003");
    assert_eq!(body["htmlContent"], "<p>#003</p>");
}

#[tokio::test]
async fn test_send_reports_rejection_as_error() {
    let fake = FakeBrevo {
        reject: true,
        ..FakeBrevo::default()
    };
    let (endpoint, _shutdown) = spawn_fake(fake).await;

    let err = mailer(&endpoint).send(&message()).await.unwrap_err();

    assert!(err.to_string().contains("status=400"));
    assert!(err.to_string().contains("sender not verified"));
}
