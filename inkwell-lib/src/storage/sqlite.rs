//! SQLite storage backend.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite::{self, OptionalExtension, params};
use async_trait::async_trait;
use dashmap::DashMap;

use super::StorageBackend;
use crate::error::StorageError;

/// Rows of the `storage` table are keyed by namespace and name. A key such as
/// `ui.rows_per_page` lands in namespace `ui`; a key without a dot, like the
/// session's `access_token`, in the empty namespace.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS storage (
        namespace TEXT NOT NULL,
        name TEXT NOT NULL,
        value BLOB NOT NULL,
        updated_at INTEGER NOT NULL,
        PRIMARY KEY (namespace, name)
    ) WITHOUT ROWID
";

/// The full key of a row, the inverse of [`split_key`].
const FULL_KEY: &str = "CASE namespace WHEN '' THEN name ELSE namespace || '.' || name END";

fn split_key(key: &str) -> (String, String) {
    match key.split_once('.') {
        Some((namespace, name)) => (namespace.to_string(), name.to_string()),
        None => (String::new(), key.to_string()),
    }
}

/// Persistent storage in a sqlite file, standing in for the browser's local
/// storage. Reads are served from a DashMap once a key has been seen.
///
/// ```ignore
/// let storage = Storage::new(SqliteBackend::open("inkwell.db").await?);
/// ```
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` in WAL mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;
        Self::init(client).await
    }

    /// A private database that lives as long as the backend.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::init(client).await
    }

    async fn init(client: Client) -> Result<Self, StorageError> {
        client.conn(|conn| conn.execute_batch(SCHEMA)).await?;
        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let (namespace, name) = split_key(key);
        let value = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT value FROM storage WHERE namespace = ?1 AND name = ?2",
                    params![namespace, name],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
            })
            .await?;

        if let Some(value) = &value {
            self.cache.insert(key.to_string(), value.clone());
        }
        Ok(value)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let (namespace, name) = split_key(key);
        let stored = value.clone();
        let now = chrono::Utc::now().timestamp();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO storage (namespace, name, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(namespace, name) DO UPDATE
                     SET value = excluded.value, updated_at = excluded.updated_at",
                    params![namespace, name, stored, now],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let (namespace, name) = split_key(key);
        self.client
            .conn(move |conn| {
                conn.execute(
                    "DELETE FROM storage WHERE namespace = ?1 AND name = ?2",
                    params![namespace, name],
                )
            })
            .await?;

        self.cache.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        // Exact byte comparison; LIKE would treat `_` and `%` as wildcards
        let sql = format!(
            "SELECT {key} FROM storage
             WHERE substr({key}, 1, length(?1)) = ?1
             ORDER BY 1",
            key = FULL_KEY
        );
        let prefix = prefix.to_string();
        self.client
            .conn(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, rusqlite::Error>>()
            })
            .await
            .map_err(StorageError::from)
    }
}
