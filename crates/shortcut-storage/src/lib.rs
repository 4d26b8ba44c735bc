//! Key-value storage for Smart Shortcuts.
//!
//! Two stores back the service:
//! - a **device-local** store that never leaves the machine (key material,
//!   instance id)
//! - a **synced** store shared across the user's devices (encrypted premium
//!   status, shortcut list, panel preferences, domain blacklist)
//!
//! Both are [`KeyValueStore`] implementations; [`FileStore`] persists a JSON
//! map on disk and [`MemoryStore`] keeps everything in process.

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use traits::{JsonStoreExt, KeyValueStore};

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend could not complete the operation
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored data could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
