//! RSVP API server entry point.

use std::error::Error;
use std::sync::Arc;

use rsvp_api::config::AppConfig;
use rsvp_api::state::AppState;
use rsvp_api::telemetry;
use rsvp_booking::application::settings::BookingSettings;
use rsvp_core::clock::SystemClock;
use rsvp_core::mailer::{DisabledMailer, Mailer};
use rsvp_mail::BrevoMailer;
use rsvp_sheets::{GoogleSheetsStore, ServiceAccountAuth, ServiceAccountKey};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let tracer_provider = telemetry::init_tracing()?;

    tracing::info!("Starting RSVP API server");

    let config = AppConfig::from_env()?;

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let key = ServiceAccountKey::new(config.sheet.client_email.clone(), &config.sheet.private_key);
    let auth = ServiceAccountAuth::new(http.clone(), key)?;
    let store = GoogleSheetsStore::new(
        http.clone(),
        Arc::new(auth),
        config.sheet.spreadsheet_id.clone(),
    )?;

    let brevo = BrevoMailer::new(http, config.brevo.clone());
    let mailer: Arc<dyn Mailer> = if brevo.is_configured() {
        Arc::new(brevo)
    } else {
        tracing::warn!("BREVO_API_KEY or BREVO_SENDER_EMAIL not set; confirmation emails disabled");
        Arc::new(DisabledMailer)
    };

    let settings = BookingSettings::new(
        config.catalog,
        config.layout,
        config.event,
        config.consistency,
        config.email_delivery,
    );
    tracing::info!(
        consistency = ?settings.consistency(),
        email_delivery = ?settings.email_delivery,
        timeslots = settings.catalog.len(),
        "booking settings loaded"
    );
    let app_state = AppState::new(settings, Arc::new(SystemClock), Arc::new(store), mailer);
    let app = rsvp_api::app(app_state);

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            eprintln!("failed to flush traces: {e}");
        }
    }

    served?;
    tracing::info!("RSVP API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
