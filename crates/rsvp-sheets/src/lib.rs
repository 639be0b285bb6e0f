//! Google Sheets-backed implementation of `SheetStore`.
//!
//! Records live in one spreadsheet tab. Requests are authenticated with a
//! service-account access token obtained through the OAuth 2.0 JWT-bearer
//! grant and cached until shortly before it expires.

pub mod auth;
pub mod client;
pub mod error;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, StaticToken, TokenProvider};
pub use client::GoogleSheetsStore;
pub use error::SheetsError;
