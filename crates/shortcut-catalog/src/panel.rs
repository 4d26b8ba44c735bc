//! Floating panel settings kept in the synced store.

use crate::CatalogResult;
use serde::{Deserialize, Serialize};
use shortcut_storage::{JsonStoreExt, KeyValueStore, StorageKeys};
use std::sync::Arc;
use url_guard::domain_matches;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelPosition {
    pub top: f64,
    pub left: f64,
}

/// Display preferences of the on-page panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PanelPosition>,
    #[serde(default)]
    pub collapsed: bool,
}

/// Panel preferences and the list of domains where the panel stays hidden.
#[derive(Clone)]
pub struct PanelSettings {
    store: Arc<dyn KeyValueStore>,
}

impl PanelSettings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn preferences(&self) -> CatalogResult<PanelPreferences> {
        Ok(self
            .store
            .get_json(StorageKeys::PANEL_PREFERENCES)?
            .unwrap_or_default())
    }

    pub fn save_preferences(&self, preferences: &PanelPreferences) -> CatalogResult<()> {
        self.store
            .set_json(StorageKeys::PANEL_PREFERENCES, preferences)?;
        Ok(())
    }

    pub fn blacklist(&self) -> CatalogResult<Vec<String>> {
        Ok(self
            .store
            .get_json(StorageKeys::DOMAIN_BLACKLIST)?
            .unwrap_or_default())
    }

    /// Add or remove `domain` from the hidden list. Returns whether the
    /// list changed.
    pub fn set_hidden(&self, domain: &str, hidden: bool) -> CatalogResult<bool> {
        let domain = domain.trim().to_ascii_lowercase();
        let mut list = self.blacklist()?;
        let present = list.iter().any(|d| *d == domain);

        let changed = match (hidden, present) {
            (true, false) => {
                list.push(domain);
                true
            }
            (false, true) => {
                list.retain(|d| *d != domain);
                true
            }
            _ => false,
        };
        if changed {
            self.store.set_json(StorageKeys::DOMAIN_BLACKLIST, &list)?;
        }
        Ok(changed)
    }

    /// Whether the panel is hidden on `host`. Entries use the same
    /// patterns as shortcut domains.
    pub fn is_hidden_on(&self, host: &str) -> CatalogResult<bool> {
        Ok(self
            .blacklist()?
            .iter()
            .any(|pattern| domain_matches(pattern, host)))
    }
}
