//! RSVP service — booking bounded context.
//!
//! Responsible for timeslot capacity, confirmation numbering, the row layout
//! of the RSVP table, and confirmation emails.

pub mod application;
pub mod domain;
