//! Confirmation email rendering.

use rsvp_core::mailer::EmailMessage;

use super::record::ConfirmationNumber;

/// Static details of the event, shown in every confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    /// Event title.
    pub name: String,
    /// Human-readable date.
    pub date: String,
    /// Venue.
    pub location: String,
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            name: "Community Dinner".into(),
            date: "Saturday, December 12".into(),
            location: "Main Hall".into(),
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the confirmation email for an accepted RSVP.
#[must_use]
pub fn confirmation_email(
    to: &str,
    number: ConfirmationNumber,
    name: &str,
    timeslot: &str,
    event: &EventDetails,
) -> EmailMessage {
    let subject = format!("RSVP Confirmation #{number} - {}", event.name);
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Your RSVP is confirmed</h2>
  <p>Hi {name},</p>
  <p>Thank you for your RSVP. Your confirmation number is:</p>
  <p style="font-size: 32px; font-weight: bold; letter-spacing: 2px;">#{number}</p>
  <table style="border-collapse: collapse;">
    <tr><td><strong>Event</strong></td><td>{event_name}</td></tr>
    <tr><td><strong>Date</strong></td><td>{date}</td></tr>
    <tr><td><strong>Time</strong></td><td>{timeslot}</td></tr>
    <tr><td><strong>Location</strong></td><td>{location}</td></tr>
  </table>
  <p>Please keep this number for check-in.</p>
</div>"#,
        name = escape_html(name),
        event_name = escape_html(&event.name),
        date = escape_html(&event.date),
        timeslot = escape_html(timeslot),
        location = escape_html(&event.location),
    );

    EmailMessage {
        to: to.to_owned(),
        subject,
        html,
    }
}
