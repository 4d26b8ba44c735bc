//! Core configuration, paths, errors and logging for Smart Shortcuts.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_COMMAND_COOLDOWN_MS, DEFAULT_FALLBACK_URL, DEFAULT_FREE_SHORTCUT_LIMIT,
    DEFAULT_KDF_ITERATIONS, DEFAULT_LICENSE_API_BASE_URL, DEFAULT_LICENSE_API_ENDPOINT,
    DEFAULT_LICENSE_TIMEOUT_SECS, DEFAULT_LOG_LEVEL,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, init_logging_for_service, parse_level};
pub use paths::Paths;
