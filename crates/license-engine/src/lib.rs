//! License activation and the encrypted premium status record.
//!
//! The licensing server is consumed through [`LicenseApi`]. Results are
//! cached in the synced store as a [`PremiumStatus`] record sealed by
//! [`state_crypto::StateCodec`]. All mutations go through
//! [`LicenseHandle`], which runs them one at a time on a worker task.

mod api;
mod client;
mod error;
mod handle;
mod instance;
mod manager;
mod repository;
mod status;

pub use api::{parse_license_body, LicenseAction, LicenseApi, LicenseApiResponse, LicenseData};
pub use client::HttpLicenseClient;
pub use error::{LicenseError, LicenseResult};
pub use handle::LicenseHandle;
pub use instance::resolve_instance_id;
pub use manager::{DeactivationOutcome, LicenseManager, RefreshOutcome};
pub use repository::StatusRepository;
pub use status::{parse_expiry, PremiumStatus};
