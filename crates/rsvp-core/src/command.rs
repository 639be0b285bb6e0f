//! Commands handled by the booking context.

use uuid::Uuid;

/// A request to change the RSVP table, traced end to end by its correlation id.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in log fields, e.g. `booking.submit_rsvp`.
    fn command_type(&self) -> &'static str;

    /// Id attached to every log line emitted while handling this command.
    fn correlation_id(&self) -> Uuid;
}
