//! Shortcut catalog.
//!
//! Shortcuts live as a JSON array in the synced store. Each one may be bound
//! to a keyboard command from a fixed pool and is scoped to the hostname of
//! its URL. Unlicensed users get a small number of shortcuts per domain.

mod catalog;
mod command;
mod panel;
mod quota;
mod shortcut;

pub use catalog::ShortcutCatalog;
pub use command::{is_pool_command, COMMAND_POOL, OPEN_OPTIONS_COMMAND};
pub use panel::{PanelPosition, PanelPreferences, PanelSettings};
pub use quota::ShortcutQuota;
pub use shortcut::{Shortcut, ShortcutDraft};

use shortcut_storage::StorageError;
use thiserror::Error;

/// Catalog errors. Display strings are shown next to the shortcut form.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Please enter a title for your shortcut")]
    MissingTitle,

    #[error("URL contains suspicious patterns or is improperly formatted")]
    Unsafe(url_guard::RejectionReason),

    #[error("{}", .0.user_message())]
    InvalidUrl(#[from] url_guard::FormatError),

    #[error("Maximum limit of {limit} shortcuts per domain ({domain}) reached.")]
    QuotaExceeded { limit: usize, domain: String },

    #[error("Command ID \"{0}\" already exists. Please choose a different one.")]
    DuplicateCommand(String),

    #[error("Unknown command ID \"{0}\"")]
    UnknownCommand(String),

    #[error("No shortcut at position {0}")]
    NotFound(usize),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
