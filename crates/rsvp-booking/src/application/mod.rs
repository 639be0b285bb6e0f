//! Application services for the booking context.

pub mod command_handlers;
pub mod query_handlers;
pub mod settings;
