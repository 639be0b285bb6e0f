//! RSVP Core — shared abstractions.
//!
//! This crate defines the traits and types that the booking context and the
//! collaborator crates depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod mailer;
pub mod store;
