//! Durable local storage for the order/user mirror.
//!
//! # Layout
//!
//! ```text
//! {data_dir}/users.json   - JSON array of users
//! {data_dir}/orders.json  - JSON array of orders
//! ```
//!
//! Each key is read once when the store is built and rewritten in full on
//! every mutation. Writes go to a sibling temp file that is then renamed
//! over the key, so a crash mid-write leaves the previous list intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Key holding the user list.
pub const USERS_KEY: &str = "users";

/// Key holding the order list.
pub const ORDERS_KEY: &str = "orders";

/// Errors from the local mirror.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored data could not be parsed.
    #[error("data corruption in {key}: {source}")]
    DataCorruption {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON-file key/value storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open storage in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                key: dir.display().to_string(),
                source,
            })?;
        Ok(Self { dir })
    }

    /// Directory this storage writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read the list stored under `key`. A missing key is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read, and
    /// `StoreError::DataCorruption` if it is not a JSON array of `T`.
    pub async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                });
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::DataCorruption {
            key: key.to_string(),
            source,
        })
    }

    /// Replace the list stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` or `StoreError::Io`.
    pub async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(items)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Fresh, empty directory under the system temp dir.
    pub(crate) fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tienda-storage-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_key_is_empty() {
        let storage = JsonFileStorage::open(temp_dir()).await.unwrap();
        let users: Vec<String> = storage.read_list(USERS_KEY).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let storage = JsonFileStorage::open(temp_dir()).await.unwrap();
        let items = vec!["a".to_string(), "b".to_string()];

        storage.write_list(ORDERS_KEY, &items).await.unwrap();
        let back: Vec<String> = storage.read_list(ORDERS_KEY).await.unwrap();
        assert_eq!(back, items);
        assert!(storage.dir().join("orders.json").exists());
        assert!(!storage.dir().join(".orders.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let storage = JsonFileStorage::open(temp_dir()).await.unwrap();
        tokio::fs::write(storage.dir().join("users.json"), b"{not json")
            .await
            .unwrap();

        let result: Result<Vec<String>, _> = storage.read_list(USERS_KEY).await;
        assert!(matches!(result, Err(StoreError::DataCorruption { .. })));
    }
}
