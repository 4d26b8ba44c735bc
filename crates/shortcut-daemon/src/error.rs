use dispatcher_protocol::ProtocolError;
use license_engine::LicenseError;
use shortcut_catalog::CatalogError;
use shortcut_config_and_utils::CoreError;
use shortcut_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the service and CLI.
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    License(#[from] LicenseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DaemonResult<T> = Result<T, DaemonError>;
