//! Structured logging for the Smart Shortcuts workspace.
//!
//! Binaries call [`init_with_config`] once and log with plain `tracing`
//! macros. Where the lines end up is decided here:
//!
//! - with the `dev` feature (default), one JSON object per line is appended
//!   to `~/.smart-shortcuts/logs/dev.jsonl`, optionally mirrored to stderr;
//! - without it, a compact stderr formatter only.
//!
//! Field values whose names look like secrets are written as `[REDACTED]`;
//! see [`is_sensitive_field`].
//!
//! ```rust,ignore
//! observability::init_with_config(
//!     observability::LogConfig::for_service("shortcut-daemon").with_stderr(),
//! );
//! tracing::info!(command = "shortcut-01", "command received");
//! ```

#[cfg(feature = "dev")]
mod dev;
mod json_layer;
mod redact;
#[cfg(feature = "dev")]
mod writer;

pub use json_layer::{JsonlLayer, LogLine};
pub use redact::{is_sensitive_field, REDACTED};
#[cfg(feature = "dev")]
pub use writer::AppendLogFile;

use std::path::PathBuf;

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Written into every line as `service`.
    pub service_name: String,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_level: String,
    /// JSONL file. `None` means `~/.smart-shortcuts/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,
    /// Mirror events to stderr in compact form.
    pub also_stderr: bool,
}

impl LogConfig {
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn with_stderr(mut self) -> Self {
        self.also_stderr = true;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Install the global subscriber for `service_name` with defaults.
pub fn init(service_name: &str) {
    init_with_config(LogConfig::for_service(service_name));
}

/// Install the global subscriber. A second call in the same process is a
/// no-op. An unopenable log file leaves only the stderr output.
pub fn init_with_config(config: LogConfig) {
    #[cfg(feature = "dev")]
    dev::install(&config);

    #[cfg(not(feature = "dev"))]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_level)),
            )
            .with_target(true)
            .compact()
            .with_writer(std::io::stderr)
            .try_init();
    }
}

pub use tracing::{debug, error, info, instrument, trace, warn, Level};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(!config.also_stderr);
    }

    #[test]
    fn builder() {
        let config = LogConfig::for_service("shortcut-daemon")
            .with_level("debug")
            .with_log_path("/tmp/x.jsonl")
            .with_stderr();
        assert_eq!(config.service_name, "shortcut-daemon");
        assert_eq!(config.default_level, "debug");
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/x.jsonl")));
        assert!(config.also_stderr);
    }
}
