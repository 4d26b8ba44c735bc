use thiserror::Error;

/// Failures while loading configuration or preparing the data directory.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid licensing URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("malformed config.json: {0}")]
    Json(#[from] serde_json::Error),

    /// The data directory could not be located.
    #[error("{0}")]
    Path(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
