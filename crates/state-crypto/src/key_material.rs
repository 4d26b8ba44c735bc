//! Device-local key material.

use base64::Engine;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use shortcut_storage::{KeyValueStore, StorageKeys, StorageResult};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Raw key material size in bytes (before base64).
pub const KEY_MATERIAL_LEN: usize = 32;

/// Base64 key material text. Zeroed on drop, never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(String);

impl KeyMaterial {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn generate() -> Self {
        let mut raw = Zeroizing::new([0u8; KEY_MATERIAL_LEN]);
        OsRng.fill_bytes(&mut raw[..]);
        Self(BASE64.encode(&raw[..]))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// Loads or creates the key material in the device-local store.
pub struct KeyMaterialStore {
    store: Arc<dyn KeyValueStore>,
    cached: Mutex<Option<KeyMaterial>>,
}

impl KeyMaterialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cached: Mutex::new(None),
        }
    }

    /// Return the persisted key material, generating and persisting it on
    /// first use.
    ///
    /// The lock is held across read, generate and write, so concurrent first
    /// callers in this process persist exactly one value.
    pub fn get_or_create(&self) -> StorageResult<KeyMaterial> {
        let mut cached = self.cached.lock();
        if let Some(material) = cached.as_ref() {
            return Ok(material.clone());
        }

        let material = match self.store.get(StorageKeys::KEY_MATERIAL)? {
            Some(existing) => {
                if !is_well_formed(&existing) {
                    warn!("stored key material is not 32 base64 bytes; using it as-is");
                }
                KeyMaterial(existing)
            }
            None => {
                let material = KeyMaterial::generate();
                self.store.set(StorageKeys::KEY_MATERIAL, &material.0)?;
                info!("generated new key material");
                material
            }
        };

        *cached = Some(material.clone());
        Ok(material)
    }
}

fn is_well_formed(text: &str) -> bool {
    BASE64
        .decode(text)
        .map(|bytes| bytes.len() == KEY_MATERIAL_LEN)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortcut_storage::{MemoryStore, StorageError};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Backend("read-only".into()))
        }
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }
        fn delete(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }
        fn keys(&self) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn generates_once_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let keys = KeyMaterialStore::new(store.clone());

        let first = keys.get_or_create().unwrap();
        let second = keys.get_or_create().unwrap();
        assert_eq!(first, second);

        let persisted = store.get(StorageKeys::KEY_MATERIAL).unwrap().unwrap();
        assert!(is_well_formed(&persisted));
        assert_eq!(first.as_bytes(), persisted.as_bytes());
    }

    #[test]
    fn reuses_existing_material() {
        let store = Arc::new(MemoryStore::new());
        store.set(StorageKeys::KEY_MATERIAL, "existing-material").unwrap();

        let material = KeyMaterialStore::new(store).get_or_create().unwrap();
        assert_eq!(material.as_bytes(), b"existing-material");
    }

    #[test]
    fn separate_stores_share_persisted_material() {
        let store = Arc::new(MemoryStore::new());
        let a = KeyMaterialStore::new(store.clone()).get_or_create().unwrap();
        let b = KeyMaterialStore::new(store).get_or_create().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn concurrent_first_use_persists_one_value() {
        let store = Arc::new(MemoryStore::new());
        let keys = Arc::new(KeyMaterialStore::new(store.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let keys = keys.clone();
                std::thread::spawn(move || keys.get_or_create().unwrap())
            })
            .collect();
        let results: Vec<KeyMaterial> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        let persisted = store.get(StorageKeys::KEY_MATERIAL).unwrap().unwrap();
        assert_eq!(results[0].as_bytes(), persisted.as_bytes());
    }

    #[test]
    fn storage_failure_propagates() {
        let keys = KeyMaterialStore::new(Arc::new(FailingStore));
        assert!(matches!(keys.get_or_create(), Err(StorageError::Backend(_))));
    }

    #[test]
    fn debug_output_is_redacted() {
        let material = KeyMaterial::generate();
        assert_eq!(format!("{:?}", material), "KeyMaterial([REDACTED])");
    }
}
