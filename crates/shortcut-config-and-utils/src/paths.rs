//! File system paths.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Manages file system paths for the shortcut service.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.smart-shortcuts)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.smart-shortcuts`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".smart-shortcuts"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.smart-shortcuts).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.smart-shortcuts/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Device-local store, never synced (~/.smart-shortcuts/local-store.json).
    pub fn local_store_file(&self) -> PathBuf {
        self.base_dir.join("local-store.json")
    }

    /// Synced store (~/.smart-shortcuts/sync-store.json).
    pub fn sync_store_file(&self) -> PathBuf {
        self.base_dir.join("sync-store.json")
    }

    /// Get the logs directory (~/.smart-shortcuts/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Central JSONL log file (~/.smart-shortcuts/logs/dev.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("dev.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
