//! Brevo-backed implementation of `Mailer`.

pub mod brevo;

pub use brevo::{BrevoConfig, BrevoMailer};
