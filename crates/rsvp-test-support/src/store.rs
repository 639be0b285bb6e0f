//! Test sheet stores — mock `SheetStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rsvp_core::error::DomainError;
use rsvp_core::store::{Row, SheetStore};

/// Builds a row from string slices.
#[must_use]
pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| (*c).to_owned()).collect()
}

/// Zero-based inclusive column bounds of an A1 range such as `Sheet1!A:E`.
/// Ranges without a column part cover every column.
fn column_bounds(range: &str) -> (usize, usize) {
    let cols = range.rsplit('!').next().unwrap_or(range);
    let mut parts = cols.split(':');
    let start = parts.next().and_then(column_index);
    let end = parts.next().and_then(column_index).or(start);
    match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => (0, usize::MAX),
    }
}

fn column_index(cell_ref: &str) -> Option<usize> {
    let letters: String = cell_ref.chars().take_while(char::is_ascii_alphabetic).collect();
    if letters.is_empty() {
        return None;
    }
    Some(
        letters
            .to_ascii_uppercase()
            .bytes()
            .fold(0usize, |acc, b| acc * 26 + usize::from(b - b'A' + 1))
            - 1,
    )
}

/// An in-memory table. Reads project the requested columns the way the
/// remote API does (trailing empty cells dropped); appends are recorded and
/// become visible to later reads.
#[derive(Debug, Default)]
pub struct InMemorySheetStore {
    rows: Mutex<Vec<Row>>,
    appended: Mutex<Vec<(String, Vec<Row>)>>,
}

impl InMemorySheetStore {
    /// Create a store pre-populated with `rows` (header included).
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Mutex::new(rows),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns every `append_rows` call as `(range, rows)`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended(&self) -> Vec<(String, Vec<Row>)> {
        self.appended.lock().unwrap().clone()
    }

    /// Returns the full table contents.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn rows(&self) -> Vec<Row> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetStore for InMemorySheetStore {
    async fn read_range(&self, range: &str) -> Result<Vec<Row>, DomainError> {
        let (start, end) = column_bounds(range);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .map(|r| {
                let mut projected: Row = r
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i >= start && *i <= end)
                    .map(|(_, c)| c.clone())
                    .collect();
                while projected.last().is_some_and(String::is_empty) {
                    projected.pop();
                }
                projected
            })
            .collect())
    }

    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> Result<(), DomainError> {
        self.rows.lock().unwrap().extend(rows.iter().cloned());
        self.appended
            .lock()
            .unwrap()
            .push((range.to_owned(), rows));
        Ok(())
    }
}

/// A store whose reads and appends always fail.
#[derive(Debug, Default)]
pub struct FailingSheetStore;

#[async_trait]
impl SheetStore for FailingSheetStore {
    async fn read_range(&self, _range: &str) -> Result<Vec<Row>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_rows(&self, _range: &str, _rows: Vec<Row>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A store that serves reads from memory but rejects every append.
#[derive(Debug, Default)]
pub struct AppendFailingSheetStore {
    inner: InMemorySheetStore,
}

impl AppendFailingSheetStore {
    /// Create a store whose reads return `rows`.
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            inner: InMemorySheetStore::new(rows),
        }
    }
}

#[async_trait]
impl SheetStore for AppendFailingSheetStore {
    async fn read_range(&self, range: &str) -> Result<Vec<Row>, DomainError> {
        self.inner.read_range(range).await
    }

    async fn append_rows(&self, _range: &str, _rows: Vec<Row>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("quota exceeded".into()))
    }
}
