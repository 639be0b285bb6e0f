//! Tracing setup: JSON logs filtered by `RUST_LOG`, plus OTLP trace export
//! when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

/// Service name reported in logs and traces.
pub const SERVICE_NAME: &str = "rsvp-api";

fn build_tracer_provider(endpoint: &str) -> Result<SdkTracerProvider, AppError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| AppError::Telemetry(e.to_string()))?;
    let resource = Resource::builder_empty()
        .with_attributes([
            KeyValue::new("service.name", SERVICE_NAME),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();
    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Installs the global subscriber. The returned provider, if any, must be
/// shut down before exit to flush pending spans.
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the exporter cannot be built or a global
/// subscriber is already installed.
pub fn init_tracing() -> Result<Option<SdkTracerProvider>, AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json();
    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .filter(|v| !v.trim().is_empty());
    match endpoint {
        Some(endpoint) => {
            let provider = build_tracer_provider(&endpoint)?;
            let otel_layer =
                tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME));
            registry
                .with(otel_layer)
                .try_init()
                .map_err(|e| AppError::Telemetry(e.to_string()))?;
            opentelemetry::global::set_tracer_provider(provider.clone());
            Ok(Some(provider))
        }
        None => {
            registry
                .try_init()
                .map_err(|e| AppError::Telemetry(e.to_string()))?;
            Ok(None)
        }
    }
}
