//! Configuration management.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Licensing API host (can be overridden at compile time via LICENSE_API_BASE_URL env var).
pub const DEFAULT_LICENSE_API_BASE_URL: &str = match option_env!("LICENSE_API_BASE_URL") {
    Some(url) => url,
    None => "https://ridwancard.my.id",
};

/// Licensing middleware path appended to the base URL.
pub const DEFAULT_LICENSE_API_ENDPOINT: &str = "/v1/api.php";

/// Timeout for a single licensing request.
pub const DEFAULT_LICENSE_TIMEOUT_SECS: u64 = 15;

/// Page opened when a URL cannot be sanitized into something navigable.
pub const DEFAULT_FALLBACK_URL: &str = "chrome://newtab";

/// Minimum gap between two dispatched keyboard commands.
pub const DEFAULT_COMMAND_COOLDOWN_MS: u64 = 1000;

/// PBKDF2 rounds for the status codec. Values below this are raised to it.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Shortcuts allowed per domain without a license.
pub const DEFAULT_FREE_SHORTCUT_LIMIT: usize = 3;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Licensing API host.
    #[serde(default = "default_license_api_base_url")]
    pub license_api_base_url: String,
    /// Licensing API path.
    #[serde(default = "default_license_api_endpoint")]
    pub license_api_endpoint: String,
    /// Licensing request timeout in seconds.
    #[serde(default = "default_license_timeout_secs")]
    pub license_request_timeout_secs: u64,
    /// Fixed extension-instance identifier sent to the licensing API.
    /// Generated and persisted in the device-local store when unset.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Safe default page used by the URL sanitizer.
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    /// Keyboard command cooldown in milliseconds.
    #[serde(default = "default_command_cooldown_ms")]
    pub command_cooldown_ms: u64,
    /// PBKDF2 iteration count for the status codec.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
    /// Shortcuts allowed per domain for unlicensed users.
    #[serde(default = "default_free_shortcut_limit")]
    pub free_shortcut_limit: usize,
    /// High-risk substrings for the URL safety gate. `None` keeps the built-in list.
    #[serde(default)]
    pub blocklist: Option<Vec<String>>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_license_api_base_url() -> String {
    DEFAULT_LICENSE_API_BASE_URL.to_string()
}

fn default_license_api_endpoint() -> String {
    DEFAULT_LICENSE_API_ENDPOINT.to_string()
}

fn default_license_timeout_secs() -> u64 {
    DEFAULT_LICENSE_TIMEOUT_SECS
}

fn default_fallback_url() -> String {
    DEFAULT_FALLBACK_URL.to_string()
}

fn default_command_cooldown_ms() -> u64 {
    DEFAULT_COMMAND_COOLDOWN_MS
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

fn default_free_shortcut_limit() -> usize {
    DEFAULT_FREE_SHORTCUT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            license_api_base_url: default_license_api_base_url(),
            license_api_endpoint: default_license_api_endpoint(),
            license_request_timeout_secs: DEFAULT_LICENSE_TIMEOUT_SECS,
            instance_id: None,
            fallback_url: default_fallback_url(),
            command_cooldown_ms: DEFAULT_COMMAND_COOLDOWN_MS,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            free_shortcut_limit: DEFAULT_FREE_SHORTCUT_LIMIT,
            blocklist: None,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Only log_level can be overridden at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("SMART_SHORTCUTS_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.free_shortcut_limit == 0 {
            return Err(CoreError::Config(
                "free_shortcut_limit must be at least 1".to_string(),
            ));
        }
        self.license_api_url()?;
        Ok(())
    }

    /// Full licensing endpoint URL (base + endpoint, no query).
    pub fn license_api_url(&self) -> CoreResult<Url> {
        let joined = format!(
            "{}{}",
            self.license_api_base_url.trim_end_matches('/'),
            self.license_api_endpoint
        );
        Url::parse(&joined).map_err(CoreError::from)
    }

    /// Licensing request timeout.
    pub fn license_request_timeout(&self) -> Duration {
        Duration::from_secs(self.license_request_timeout_secs)
    }

    /// Keyboard command cooldown.
    pub fn command_cooldown(&self) -> Duration {
        Duration::from_millis(self.command_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.fallback_url, DEFAULT_FALLBACK_URL);
        assert_eq!(config.command_cooldown(), Duration::from_secs(1));
        assert_eq!(config.kdf_iterations, 100_000);
        assert_eq!(config.free_shortcut_limit, 3);
        assert!(config.blocklist.is_none());
        assert!(config.instance_id.is_none());
    }

    #[test]
    fn test_config_load_from_file_partial() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(
            &config_path,
            r#"{ "log_level": "debug", "blocklist": ["bad."] }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.blocklist, Some(vec!["bad.".to_string()]));
        assert_eq!(config.command_cooldown_ms, DEFAULT_COMMAND_COOLDOWN_MS);
        assert_eq!(config.license_api_endpoint, DEFAULT_LICENSE_API_ENDPOINT);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = Config::default();
        config.log_level = "trace".to_string();
        config.free_shortcut_limit = 5;
        config.instance_id = Some("instance-1".to_string());
        config.save(&paths).unwrap();

        let loaded = Config::load(&paths).unwrap();
        assert_eq!(loaded.free_shortcut_limit, 5);
        assert_eq!(loaded.instance_id.as_deref(), Some("instance-1"));
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.license_api_base_url, DEFAULT_LICENSE_API_BASE_URL);
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = Config::default();
        config.free_shortcut_limit = 0;
        config.save(&paths).unwrap();

        assert!(matches!(Config::load(&paths), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_license_api_url_joins_endpoint() {
        let mut config = Config::default();
        config.license_api_base_url = "https://licenses.example.com/".to_string();

        let url = config.license_api_url().unwrap();
        assert_eq!(url.as_str(), "https://licenses.example.com/v1/api.php");
    }

    #[test]
    fn test_license_api_url_invalid() {
        let mut config = Config::default();
        config.license_api_base_url = "not a valid url".to_string();

        assert!(config.license_api_url().is_err());
    }
}
