//! Sheet store abstraction.
//!
//! The RSVP table lives in an external, row-oriented store addressed by
//! A1-notation ranges (`Sheet1!A:E`). Rows come back as ordered text cells;
//! short rows are not padded, so callers must tolerate missing trailing cells.

use async_trait::async_trait;

use crate::error::DomainError;

/// One row of text cells.
pub type Row = Vec<String>;

/// Read/append access to a rectangular range of a remote table.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read every row in `range`, in table order.
    async fn read_range(&self, range: &str) -> Result<Vec<Row>, DomainError>;

    /// Append `rows` after the last populated row of `range`.
    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> Result<(), DomainError>;
}
