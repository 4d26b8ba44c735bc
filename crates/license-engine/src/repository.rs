//! Encrypted premium status in the synced store.

use crate::{LicenseResult, PremiumStatus};
use shortcut_storage::{KeyValueStore, StorageKeys, StorageResult};
use state_crypto::StateCodec;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads and writes the premium status record, always sealed.
#[derive(Clone)]
pub struct StatusRepository {
    store: Arc<dyn KeyValueStore>,
    codec: Arc<StateCodec>,
}

impl StatusRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, codec: Arc<StateCodec>) -> Self {
        Self { store, codec }
    }

    /// Current record. Missing, unreadable or tampered state reads as the
    /// inactive default.
    pub fn read_status(&self) -> PremiumStatus {
        let blob = match self.store.get(StorageKeys::ENCRYPTED_PREMIUM_STATUS) {
            Ok(Some(blob)) => blob,
            Ok(None) => return PremiumStatus::default(),
            Err(e) => {
                warn!(error = %e, "failed to read premium status; assuming inactive");
                return PremiumStatus::default();
            }
        };

        self.codec.decrypt(&blob).unwrap_or_else(|| {
            debug!("premium status blob unreadable; assuming inactive");
            PremiumStatus::default()
        })
    }

    /// Seal and persist `status`, replacing the previous record.
    pub fn write_status(&self, status: &PremiumStatus) -> LicenseResult<()> {
        let blob = self.codec.encrypt(status)?;
        self.store.set(StorageKeys::ENCRYPTED_PREMIUM_STATUS, &blob)?;
        debug!(active = status.active, "premium status written");
        Ok(())
    }

    pub fn clear_status(&self) -> StorageResult<()> {
        self.store.delete(StorageKeys::ENCRYPTED_PREMIUM_STATUS)?;
        debug!("premium status cleared");
        Ok(())
    }
}
