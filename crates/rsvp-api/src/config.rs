//! Server configuration sourced from environment variables, with an optional
//! YAML file (`RSVP_CONFIG`) overriding the event and timeslot settings.

use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use rsvp_booking::application::settings::{ConsistencyMode, EmailDelivery, TableLayout};
use rsvp_booking::domain::confirmation_email::EventDetails;
use rsvp_booking::domain::timeslot::{
    DEFAULT_CAPACITY, DEFAULT_TIMESLOTS, Timeslot, TimeslotCatalog,
};
use rsvp_mail::BrevoConfig;
use serde::Deserialize;

use crate::error::AppError;

/// Where the RSVP table lives and how to authenticate to it.
#[derive(Clone)]
pub struct SheetConfig {
    /// Spreadsheet id from the sheet URL.
    pub spreadsheet_id: String,
    /// Service-account `client_email`.
    pub client_email: String,
    /// Service-account private key (PEM, `\n` may be escaped).
    pub private_key: String,
}

impl std::fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Sheets access.
    pub sheet: SheetConfig,
    /// Tab holding the records.
    pub layout: TableLayout,
    /// Recognized timeslots and limits.
    pub catalog: TimeslotCatalog,
    /// Limit for slots listed without their own capacity.
    pub max_per_slot: u32,
    /// Details printed in confirmation emails.
    pub event: EventDetails,
    /// Submission isolation.
    pub consistency: ConsistencyMode,
    /// Email sequencing.
    pub email_delivery: EmailDelivery,
    /// Timeout for every outbound HTTP call.
    pub http_timeout: Duration,
    /// Mail provider credentials.
    pub brevo: BrevoConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileOverrides {
    sheet_name: Option<String>,
    max_per_slot: Option<u32>,
    timeslots: Option<Vec<TimeslotOverride>>,
    event: Option<EventOverride>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimeslotOverride {
    label: String,
    capacity: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventOverride {
    name: Option<String>,
    date: Option<String>,
    location: Option<String>,
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        _ => Ok(default),
    }
}

/// Parses `RSVP_TIMESLOTS`: comma-separated labels, each optionally
/// followed by `=capacity`, e.g. `18:00=56,19:30=40`.
pub fn parse_timeslots(raw: &str, default_capacity: u32) -> Result<TimeslotCatalog, AppError> {
    let mut slots = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let slot = match entry.split_once('=') {
            Some((label, capacity)) => {
                let capacity = capacity.trim().parse::<u32>().map_err(|e| {
                    AppError::Config(format!("RSVP_TIMESLOTS capacity for '{label}': {e}"))
                })?;
                Timeslot::new(label.trim(), capacity)
            }
            None => Timeslot::new(entry, default_capacity),
        };
        slots.push(slot);
    }
    TimeslotCatalog::new(slots).map_err(|e| AppError::Config(format!("RSVP_TIMESLOTS: {e}")))
}

impl AppConfig {
    /// Reads the process environment (and `RSVP_CONFIG`, if set).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for missing required variables, unparsable
    /// values, or an unreadable override file.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if let Ok(path) = std::env::var("RSVP_CONFIG") {
            let contents = fs::read_to_string(&path)
                .map_err(|e| AppError::Config(format!("read RSVP_CONFIG {path}: {e}")))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`], minus the file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        let sheet = SheetConfig {
            spreadsheet_id: required(&lookup, "GOOGLE_SHEET_ID")?,
            client_email: required(&lookup, "GOOGLE_SERVICE_ACCOUNT_EMAIL")?,
            private_key: required(&lookup, "GOOGLE_PRIVATE_KEY")?,
        };
        let layout = TableLayout::new(
            lookup("GOOGLE_SHEET_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "Sheet1".to_string()),
        );

        let max_per_slot = parse_or(&lookup, "RSVP_MAX_PER_SLOT", DEFAULT_CAPACITY)?;
        let catalog = match lookup("RSVP_TIMESLOTS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_timeslots(&raw, max_per_slot)?,
            None => TimeslotCatalog::uniform(&DEFAULT_TIMESLOTS, max_per_slot)
                .map_err(|e| AppError::Config(e.to_string()))?,
        };

        let defaults = EventDetails::default();
        let event = EventDetails {
            name: lookup("EVENT_NAME").unwrap_or(defaults.name),
            date: lookup("EVENT_DATE").unwrap_or(defaults.date),
            location: lookup("EVENT_LOCATION").unwrap_or(defaults.location),
        };

        let timeout_secs: u64 = parse_or(&lookup, "RSVP_HTTP_TIMEOUT_SECS", 30)?;

        Ok(Self {
            bind_addr,
            sheet,
            layout,
            catalog,
            max_per_slot,
            event,
            consistency: parse_or(&lookup, "RSVP_CONSISTENCY", ConsistencyMode::default())?,
            email_delivery: parse_or(&lookup, "RSVP_EMAIL_DELIVERY", EmailDelivery::default())?,
            http_timeout: Duration::from_secs(timeout_secs),
            brevo: BrevoConfig {
                api_key: lookup("BREVO_API_KEY").unwrap_or_default(),
                sender_email: lookup("BREVO_SENDER_EMAIL").unwrap_or_default(),
                sender_name: lookup("BREVO_SENDER_NAME").filter(|v| !v.trim().is_empty()),
            },
        })
    }

    /// Applies a YAML override document on top of the current values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the document does not parse or names an
    /// invalid timeslot set.
    pub fn apply_yaml(&mut self, contents: &str) -> Result<(), AppError> {
        let overrides: FileOverrides = serde_yaml::from_str(contents)
            .map_err(|e| AppError::Config(format!("parse RSVP_CONFIG yaml: {e}")))?;

        if let Some(sheet_name) = overrides.sheet_name {
            self.layout = TableLayout::new(sheet_name);
        }
        if let Some(capacity) = overrides.max_per_slot {
            self.max_per_slot = capacity;
        }
        if let Some(slots) = overrides.timeslots {
            let default_capacity = self.max_per_slot;
            self.catalog = TimeslotCatalog::new(
                slots
                    .into_iter()
                    .map(|s| Timeslot::new(s.label, s.capacity.unwrap_or(default_capacity)))
                    .collect(),
            )
            .map_err(|e| AppError::Config(format!("RSVP_CONFIG timeslots: {e}")))?;
        } else if let Some(capacity) = overrides.max_per_slot {
            let labels: Vec<String> = self.catalog.iter().map(|s| s.label.clone()).collect();
            self.catalog = TimeslotCatalog::new(
                labels
                    .into_iter()
                    .map(|label| Timeslot::new(label, capacity))
                    .collect(),
            )
            .map_err(|e| AppError::Config(e.to_string()))?;
        }
        if let Some(event) = overrides.event {
            if let Some(name) = event.name {
                self.event.name = name;
            }
            if let Some(date) = event.date {
                self.event.date = date;
            }
            if let Some(location) = event.location {
                self.event.location = location;
            }
        }
        Ok(())
    }
}
