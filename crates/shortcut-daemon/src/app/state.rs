//! Service state definition.

use crate::{DaemonResult, Navigator};
use chrono::Utc;
use license_engine::{
    resolve_instance_id, HttpLicenseClient, LicenseApi, LicenseHandle, LicenseManager,
    LicenseResult, StatusRepository,
};
use shortcut_catalog::{PanelSettings, ShortcutCatalog, ShortcutQuota};
use shortcut_config_and_utils::{Config, Paths};
use shortcut_storage::{FileStore, KeyValueStore};
use state_crypto::{KeyMaterialStore, StateCodec};
use std::sync::Arc;
use tracing::info;
use url_guard::{SafetyGate, Sanitizer};

/// Shared service state. Built once per process; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Device-local store (key material, instance id).
    pub local: Arc<dyn KeyValueStore>,
    /// Synced store (status blob, shortcuts, panel settings).
    pub synced: Arc<dyn KeyValueStore>,
    pub catalog: ShortcutCatalog,
    pub panel: PanelSettings,
    pub gate: Arc<SafetyGate>,
    pub sanitizer: Arc<Sanitizer>,
    /// Single-writer license worker.
    pub license: LicenseHandle,
    pub navigator: Arc<dyn Navigator>,
}

impl AppState {
    /// Build state over the JSON-file stores under `paths` and the HTTP
    /// licensing client. Must run inside a tokio runtime.
    pub fn build(config: Config, paths: &Paths, navigator: Arc<dyn Navigator>) -> DaemonResult<Self> {
        paths.ensure_dirs()?;
        let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(paths.local_store_file()));
        let synced: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(paths.sync_store_file()));
        let api: Arc<dyn LicenseApi> = Arc::new(HttpLicenseClient::from_config(&config)?);

        info!(base_dir = %paths.base_dir().display(), "building service state");
        Self::with_parts(config, local, synced, api, navigator)
    }

    /// Build state over caller-provided stores and licensing client.
    /// Must run inside a tokio runtime.
    pub fn with_parts(
        config: Config,
        local: Arc<dyn KeyValueStore>,
        synced: Arc<dyn KeyValueStore>,
        api: Arc<dyn LicenseApi>,
        navigator: Arc<dyn Navigator>,
    ) -> DaemonResult<Self> {
        let keys = Arc::new(KeyMaterialStore::new(local.clone()));
        let codec = Arc::new(StateCodec::new(keys, config.kdf_iterations));
        let repository = StatusRepository::new(synced.clone(), codec);

        let instance_id = resolve_instance_id(config.instance_id.as_deref(), local.as_ref())?;
        let license = LicenseHandle::spawn(LicenseManager::new(api, repository, instance_id));

        let gate = Arc::new(SafetyGate::with_blocklist(config.blocklist.clone()));

        Ok(Self {
            catalog: ShortcutCatalog::new(synced.clone(), gate.clone()),
            panel: PanelSettings::new(synced.clone()),
            gate,
            sanitizer: Arc::new(Sanitizer::new(config.fallback_url.clone())),
            config: Arc::new(config),
            local,
            synced,
            license,
            navigator,
        })
    }

    /// Per-domain shortcut quota from the current premium status.
    pub async fn quota(&self) -> LicenseResult<ShortcutQuota> {
        let status = self.license.info().await?;
        Ok(ShortcutQuota::from_status(
            &status,
            Utc::now(),
            self.config.free_shortcut_limit,
        ))
    }
}
