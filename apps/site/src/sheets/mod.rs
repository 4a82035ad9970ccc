/// Sheets: the backing store for feedback rows.
///
/// The service depends on exactly two operations against the sheet: reading
/// the first row (which doubles as the emptiness check) and appending a row.
/// Header rows and data rows go through the same append; rows are never
/// updated or deleted.
///
/// `AppState` holds an `Arc<dyn SheetStore>`, picked at startup via config.
use async_trait::async_trait;
use thiserror::Error;

pub mod auth;
pub mod google;
pub mod headers;
pub mod memory;
#[cfg(test)]
pub(crate) mod stub_server;

pub use google::GoogleSheetsClient;
pub use headers::{ensure_headers, HeaderCheck};
pub use memory::MemorySheet;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Credential error: {0}")]
    Auth(String),

    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid sheets endpoint: {0}")]
    Endpoint(String),
}

/// A two-dimensional, append-only tabular store.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Values of the first row, or `None` when the sheet has no rows.
    async fn first_row(&self) -> Result<Option<Vec<String>>, StoreError>;

    /// Appends `row` after the last non-empty row. All-or-nothing.
    async fn append_row(&self, row: &[String]) -> Result<(), StoreError>;
}
