//! Persisted UI preferences.

use inkwell_lib::error::StorageError;
use inkwell_lib::storage::Storage;

const PREFIX: &str = "ui.";
const ROWS_PER_PAGE_KEY: &str = "ui.rows_per_page";

/// Typed access to the preferences kept next to the session tokens.
#[derive(Debug, Clone)]
pub struct Settings {
    storage: Storage,
}

impl Settings {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The saved page size, if it is one of `options`; otherwise `default`.
    pub async fn rows_per_page(&self, options: &[usize], default: usize) -> usize {
        match self.storage.get::<u64>(ROWS_PER_PAGE_KEY).await {
            Ok(Some(saved)) if options.contains(&(saved as usize)) => saved as usize,
            Ok(_) => default,
            Err(e) => {
                log::warn!("[settings] failed to read rows per page: {}", e);
                default
            }
        }
    }

    pub async fn set_rows_per_page(&self, rows: usize) -> Result<(), StorageError> {
        self.storage.set(ROWS_PER_PAGE_KEY, &(rows as u64)).await
    }

    /// Forget every saved preference. Session tokens are left alone.
    pub async fn reset(&self) -> Result<usize, StorageError> {
        let keys = self.storage.keys_with_prefix(PREFIX).await?;
        for key in &keys {
            self.storage.delete(key).await?;
        }
        log::info!("[settings] reset {} preferences", keys.len());
        Ok(keys.len())
    }
}
