//! Domain types for the booking context.

pub mod commands;
pub mod confirmation_email;
pub mod record;
pub mod timeslot;
