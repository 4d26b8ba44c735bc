//! Storage trait definitions.

use crate::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A string key-value store, either device-local or synced.
pub trait KeyValueStore: Send + Sync {
    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value. Returns whether it existed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All stored keys, in no particular order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// JSON helpers over any [`KeyValueStore`].
pub trait JsonStoreExt: KeyValueStore {
    /// Read and deserialize a JSON value.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Encoding(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    /// Serialize and store a JSON value.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StorageError::Encoding(format!("{}: {}", key, e)))?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}
