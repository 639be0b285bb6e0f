//! Shared application state.

use std::sync::Arc;

use rsvp_booking::application::settings::BookingSettings;
use rsvp_core::clock::Clock;
use rsvp_core::mailer::Mailer;
use rsvp_core::store::SheetStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Timeslots, table layout, event details and delivery policies.
    pub settings: Arc<BookingSettings>,
    /// Source of submission timestamps.
    pub clock: Arc<dyn Clock>,
    /// The RSVP table.
    pub store: Arc<dyn SheetStore>,
    /// Confirmation email sender.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        settings: BookingSettings,
        clock: Arc<dyn Clock>,
        store: Arc<dyn SheetStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            clock,
            store,
            mailer,
        }
    }
}
