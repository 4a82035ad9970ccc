use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::sheets::{SheetStore, StoreError};

pub const DEFAULT_HEADERS: &[&str] = &["Timestamp", "Name", "Email", "Message"];

/// Result of comparing the sheet's first row against the expected headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCheck {
    /// The sheet was empty; the expected headers were appended.
    Created,
    /// The first row already equals the expected headers.
    Matched,
    /// The first row differs. `difference` is the symmetric difference of the
    /// two name sets; it is empty when only the column order differs.
    Mismatch { difference: BTreeSet<String> },
}

/// Ensures the first row of `store` equals `expected`.
///
/// Appends the header row only when the sheet is empty. A mismatching header
/// is reported, never repaired; the caller decides whether it is fatal.
pub async fn ensure_headers(
    store: &dyn SheetStore,
    expected: &[String],
) -> Result<HeaderCheck, StoreError> {
    let current = store.first_row().await?.unwrap_or_default();

    if current.is_empty() {
        store.append_row(expected).await?;
        info!("Sheet was empty, wrote header row: {:?}", expected);
        return Ok(HeaderCheck::Created);
    }

    if current == expected {
        return Ok(HeaderCheck::Matched);
    }

    let difference = header_difference(&current, expected);
    warn!("Header mismatch found. Difference: {:?}", difference);
    Ok(HeaderCheck::Mismatch { difference })
}

/// Names present in exactly one of the two header rows.
pub fn header_difference(current: &[String], expected: &[String]) -> BTreeSet<String> {
    let current: BTreeSet<&String> = current.iter().collect();
    let expected: BTreeSet<&String> = expected.iter().collect();
    current
        .symmetric_difference(&expected)
        .map(|name| name.to_string())
        .collect()
}
