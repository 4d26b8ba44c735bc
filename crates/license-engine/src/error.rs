use shortcut_config_and_utils::CoreError;
use shortcut_storage::StorageError;
use state_crypto::CryptoError;
use thiserror::Error;

/// License operation errors.
///
/// Display strings are shown to the user as-is.
#[derive(Error, Debug)]
pub enum LicenseError {
    #[error("A license key is required")]
    MissingLicenseKey,

    #[error("Server responded with status: {0}")]
    Status(u16),

    #[error("License server request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse server response: {0}")]
    Parse(String),

    #[error("Invalid licensing configuration: {0}")]
    Config(#[from] CoreError),

    /// The server answered and refused the license.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to secure license status: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("License worker is not running")]
    WorkerUnavailable,

    #[error("License status task failed: {0}")]
    Task(String),
}

pub type LicenseResult<T> = Result<T, LicenseError>;
