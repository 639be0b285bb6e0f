//! Sheets v4 `values` API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use rsvp_core::error::DomainError;
use rsvp_core::store::{Row, SheetStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::auth::TokenProvider;
use crate::error::SheetsError;

/// Production Sheets API root.
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: &'a [Row],
}

/// Renders a cell as text. Formatted reads already return strings; numbers
/// and booleans can appear when a sheet is edited by hand.
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A `SheetStore` over one spreadsheet.
#[derive(Clone)]
pub struct GoogleSheetsStore {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: Url,
    spreadsheet_id: String,
}

impl std::fmt::Debug for GoogleSheetsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsStore")
            .field("base_url", &self.base_url.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

impl GoogleSheetsStore {
    /// Creates a store against the production API.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in base URL; see [`GoogleSheetsStore::with_base_url`].
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        spreadsheet_id: impl Into<String>,
    ) -> Result<Self, SheetsError> {
        Self::with_base_url(http, tokens, spreadsheet_id, SHEETS_API_BASE)
    }

    /// Creates a store against an alternative API root (an emulator or a
    /// test server).
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::Url` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        spreadsheet_id: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let base_url = Url::parse(base_url).map_err(|e| SheetsError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::Url(format!("{base_url} cannot be a base")));
        }
        Ok(Self {
            http,
            tokens,
            base_url,
            spreadsheet_id: spreadsheet_id.into(),
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{last_segment}` with each segment
    /// percent-encoded.
    fn values_url(&self, last_segment: &str) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SheetsError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                last_segment,
            ]);
        Ok(url)
    }

    async fn check(
        response: reqwest::Response,
        context: &'static str,
    ) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SheetsError::Status {
            context,
            status: status.as_u16(),
            body,
        })
    }

    /// Reads `range` and returns its rows as text.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError` on token, transport, or status failure.
    pub async fn get_values(&self, range: &str) -> Result<Vec<Row>, SheetsError> {
        let token = self.tokens.access_token().await?;
        let url = self.values_url(range)?;

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let body: ValueRange = Self::check(response, "values.get").await?.json().await?;

        Ok(body
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    /// Appends `rows` below the table found in `range`. Cells are stored
    /// verbatim (`RAW`): guest input is never parsed as a formula, date or
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError` on token, transport, or status failure.
    pub async fn append_values(&self, range: &str, rows: &[Row]) -> Result<(), SheetsError> {
        let token = self.tokens.access_token().await?;
        let mut url = self.values_url(&format!("{range}:append"))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&AppendBody { values: rows })
            .send()
            .await?;
        Self::check(response, "values.append").await?;
        Ok(())
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    #[instrument(skip(self))]
    async fn read_range(&self, range: &str) -> Result<Vec<Row>, DomainError> {
        let rows = self.get_values(range).await?;
        debug!(rows = rows.len(), "read sheet range");
        Ok(rows)
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> Result<(), DomainError> {
        self.append_values(range, &rows).await?;
        Ok(())
    }
}
