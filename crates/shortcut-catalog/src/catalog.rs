//! Shortcut CRUD over the synced store.

use crate::{
    is_pool_command, CatalogError, CatalogResult, Shortcut, ShortcutDraft, ShortcutQuota,
    COMMAND_POOL,
};
use shortcut_storage::{JsonStoreExt, KeyValueStore, StorageKeys};
use std::sync::Arc;
use tracing::{debug, info};
use url_guard::{
    domain_matches, extract_domain, normalize_input_url, validate_shortcut_url, FormatError,
    SafetyGate, SafetyVerdict,
};

/// The user's shortcut list.
#[derive(Clone)]
pub struct ShortcutCatalog {
    store: Arc<dyn KeyValueStore>,
    gate: Arc<SafetyGate>,
}

impl ShortcutCatalog {
    /// Catalog over `store`. Every URL saved through [`add`](Self::add) or
    /// [`update`](Self::update) must first pass `gate`.
    pub fn new(store: Arc<dyn KeyValueStore>, gate: Arc<SafetyGate>) -> Self {
        Self { store, gate }
    }

    pub fn list(&self) -> CatalogResult<Vec<Shortcut>> {
        Ok(self
            .store
            .get_json(StorageKeys::CUSTOM_SHORTCUTS)?
            .unwrap_or_default())
    }

    pub fn find_by_command(&self, command: &str) -> CatalogResult<Option<Shortcut>> {
        if command.is_empty() {
            return Ok(None);
        }
        Ok(self.list()?.into_iter().find(|s| s.command == command))
    }

    /// First command of the pool no shortcut is bound to.
    pub fn next_available_command_id(&self) -> CatalogResult<Option<&'static str>> {
        let shortcuts = self.list()?;
        Ok(COMMAND_POOL
            .iter()
            .copied()
            .find(|id| !shortcuts.iter().any(|s| s.command == *id)))
    }

    pub fn add(&self, draft: &ShortcutDraft, quota: ShortcutQuota) -> CatalogResult<Shortcut> {
        let mut shortcuts = self.list()?;
        let shortcut = self.prepare(draft, quota, &shortcuts, None)?;

        let command = shortcut.command.as_str();
        if !command.is_empty() && shortcuts.iter().any(|s| s.command == command) {
            return Err(CatalogError::DuplicateCommand(command.to_string()));
        }

        shortcuts.push(shortcut.clone());
        self.save(&shortcuts)?;
        info!(title = %shortcut.title, command = %shortcut.command, "shortcut added");
        Ok(shortcut)
    }

    /// Replace the shortcut at `index`. The edited entry does not count
    /// against its own domain quota.
    pub fn update(
        &self,
        index: usize,
        draft: &ShortcutDraft,
        quota: ShortcutQuota,
    ) -> CatalogResult<Shortcut> {
        let mut shortcuts = self.list()?;
        if index >= shortcuts.len() {
            return Err(CatalogError::NotFound(index));
        }

        let mut shortcut = self.prepare(draft, quota, &shortcuts, Some(index))?;
        shortcut.shortcut_key = std::mem::take(&mut shortcuts[index].shortcut_key);
        shortcuts[index] = shortcut.clone();
        self.save(&shortcuts)?;
        info!(index, title = %shortcut.title, "shortcut updated");
        Ok(shortcut)
    }

    pub fn delete(&self, index: usize) -> CatalogResult<Shortcut> {
        let mut shortcuts = self.list()?;
        if index >= shortcuts.len() {
            return Err(CatalogError::NotFound(index));
        }
        let removed = shortcuts.remove(index);
        self.save(&shortcuts)?;
        info!(index, title = %removed.title, "shortcut deleted");
        Ok(removed)
    }

    /// Shortcuts shown on a page at `host`: domain matches first, then
    /// shortcuts without domains.
    pub fn visible_on(&self, host: &str) -> CatalogResult<Vec<Shortcut>> {
        let (scoped, global): (Vec<Shortcut>, Vec<Shortcut>) = self
            .list()?
            .into_iter()
            .filter(|s| s.domains.is_empty() || s.domains.iter().any(|d| domain_matches(d, host)))
            .partition(|s| !s.domains.is_empty());

        debug!(host, scoped = scoped.len(), global = global.len(), "visible shortcuts");
        Ok(scoped.into_iter().chain(global).collect())
    }

    fn prepare(
        &self,
        draft: &ShortcutDraft,
        quota: ShortcutQuota,
        existing: &[Shortcut],
        editing: Option<usize>,
    ) -> CatalogResult<Shortcut> {
        // Same check the dispatcher applies before navigating, so a URL it
        // would refuse never gets stored.
        if !draft.url.trim().is_empty() {
            if let SafetyVerdict::Rejected(reason) =
                self.gate.check(&normalize_input_url(&draft.url))
            {
                return Err(CatalogError::Unsafe(reason));
            }
        }

        let title = draft.title.trim();
        if title.is_empty() {
            return Err(CatalogError::MissingTitle);
        }

        let url = validate_shortcut_url(&draft.url)?;
        let domain = extract_domain(&url).ok_or(FormatError::MissingHost)?;

        let command = draft.command_id();
        if !command.is_empty() && !is_pool_command(command) {
            return Err(CatalogError::UnknownCommand(command.to_string()));
        }

        let in_domain = existing
            .iter()
            .enumerate()
            .filter(|(i, s)| Some(*i) != editing && s.targets_domain(&domain))
            .count();
        if let ShortcutQuota::Limited(limit) = quota {
            if !quota.allows(in_domain) {
                return Err(CatalogError::QuotaExceeded { limit, domain });
            }
        }

        Ok(Shortcut {
            command: command.to_string(),
            title: title.to_string(),
            url,
            domains: vec![domain],
            shortcut_key: String::new(),
        })
    }

    fn save(&self, shortcuts: &[Shortcut]) -> CatalogResult<()> {
        self.store
            .set_json(StorageKeys::CUSTOM_SHORTCUTS, shortcuts)?;
        Ok(())
    }
}
