use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::sheets::{SheetStore, StoreError};

/// In-process sheet. Backs `FEEDBACK_STORE=memory` for local runs and stands
/// in for the remote sheet in tests.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Mutex<Vec<Vec<String>>>,
    fail_appends: Option<String>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_appends: None,
        }
    }

    /// A sheet whose appends always fault with `message`.
    #[cfg(test)]
    pub fn failing(message: &str) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_appends: Some(message.to_string()),
        }
    }

    #[cfg(test)]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<String>>> {
        // A panic while holding the lock cannot leave a half-written row behind.
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SheetStore for MemorySheet {
    async fn first_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.lock().first().cloned())
    }

    async fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        if let Some(message) = &self.fail_appends {
            return Err(StoreError::Api {
                status: 503,
                message: message.clone(),
            });
        }
        self.lock().push(row.to_vec());
        Ok(())
    }
}
