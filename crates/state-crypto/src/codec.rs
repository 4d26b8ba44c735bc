//! Authenticated encryption codec for synced state.

use crate::{CryptoError, KeyMaterial, KeyMaterialStore};
use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, warn};
use zeroize::Zeroizing;

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Current blob format version.
pub const FORMAT_V1: u8 = 0x01;
/// PBKDF2 salt size.
pub const SALT_LEN: usize = 16;
/// ChaCha20-Poly1305 nonce size (96 bits).
pub const NONCE_LEN: usize = 12;
/// Poly1305 tag size.
pub const TAG_LEN: usize = 16;
/// Bytes before the ciphertext: version, salt, nonce.
pub const PREFIX_LEN: usize = 1 + SALT_LEN + NONCE_LEN;
/// Lowest accepted PBKDF2 iteration count.
pub const MIN_ITERATIONS: u32 = 100_000;

const DERIVED_KEY_LEN: usize = 32;

/// Decoded blob length for a plaintext of `plaintext_len` bytes.
pub const fn blob_len(plaintext_len: usize) -> usize {
    PREFIX_LEN + plaintext_len + TAG_LEN
}

/// Seals and opens JSON-serializable state.
pub struct StateCodec {
    keys: Arc<KeyMaterialStore>,
    iterations: u32,
}

impl StateCodec {
    /// `iterations` below [`MIN_ITERATIONS`] are raised to it.
    pub fn new(keys: Arc<KeyMaterialStore>, iterations: u32) -> Self {
        if iterations < MIN_ITERATIONS {
            warn!(
                requested = iterations,
                floor = MIN_ITERATIONS,
                "kdf iteration count below floor; raising"
            );
        }
        Self {
            keys,
            iterations: iterations.max(MIN_ITERATIONS),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Serialize `value` to JSON and seal it into a base64 blob.
    ///
    /// Salt and nonce are fresh on every call, so sealing the same value
    /// twice yields different blobs.
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CryptoError> {
        let material = self.keys.get_or_create()?;

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = self.derive_key(&material, &salt);
        let plaintext = Zeroizing::new(serde_json::to_vec(value)?);

        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

        let mut blob = Vec::with_capacity(PREFIX_LEN + ciphertext.len());
        blob.push(FORMAT_V1);
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(blob))
    }

    /// Open a blob and deserialize it as `T`. Any failure yields `None`.
    pub fn decrypt<T: DeserializeOwned>(&self, blob: &str) -> Option<T> {
        let plaintext = self.open(blob)?;
        match serde_json::from_slice(&plaintext) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "decrypted payload does not match expected shape");
                None
            }
        }
    }

    /// Open a blob as untyped JSON.
    pub fn decrypt_value(&self, blob: &str) -> Option<serde_json::Value> {
        self.decrypt(blob)
    }

    fn open(&self, blob: &str) -> Option<Zeroizing<Vec<u8>>> {
        let bytes = match BASE64.decode(blob.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "blob is not valid base64");
                return None;
            }
        };

        if bytes.len() < PREFIX_LEN + TAG_LEN {
            debug!(len = bytes.len(), "blob too short");
            return None;
        }
        if bytes[0] != FORMAT_V1 {
            debug!(version = bytes[0], "unknown blob version");
            return None;
        }

        let salt = &bytes[1..1 + SALT_LEN];
        let nonce = &bytes[1 + SALT_LEN..PREFIX_LEN];
        let ciphertext = &bytes[PREFIX_LEN..];

        let material = match self.keys.get_or_create() {
            Ok(material) => material,
            Err(e) => {
                warn!(error = %e, "key material unavailable; treating blob as unreadable");
                return None;
            }
        };
        let key = self.derive_key(&material, salt);

        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
        match cipher.decrypt(Nonce::from_slice(nonce), ciphertext) {
            Ok(plaintext) => Some(Zeroizing::new(plaintext)),
            Err(_) => {
                warn!("blob failed authentication");
                None
            }
        }
    }

    fn derive_key(&self, material: &KeyMaterial, salt: &[u8]) -> Zeroizing<[u8; DERIVED_KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; DERIVED_KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha256>(material.as_bytes(), salt, self.iterations, &mut key[..]);
        key
    }
}
