//! At-rest encryption for state kept in the synced store.
//!
//! A random key material string lives in the device-local store. Each
//! encryption derives a fresh key from it with PBKDF2-HMAC-SHA256 and a
//! random salt, then seals the JSON payload with ChaCha20-Poly1305.
//!
//! Blob layout (base64, standard alphabet):
//!
//! ```text
//! version[1] | salt[16] | nonce[12] | ciphertext | tag[16]
//! ```
//!
//! The key material sits in the same storage sandbox as the blobs it
//! protects. This keeps cached state unreadable at a glance; it is not a
//! secrets vault.

mod codec;
mod key_material;

pub use codec::{
    blob_len, StateCodec, FORMAT_V1, MIN_ITERATIONS, NONCE_LEN, PREFIX_LEN, SALT_LEN, TAG_LEN,
};
pub use key_material::{KeyMaterial, KeyMaterialStore, KEY_MATERIAL_LEN};

use shortcut_storage::StorageError;
use thiserror::Error;

/// Errors returned when sealing state.
///
/// Opening a blob never errors; it yields `None` instead.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key material unavailable: {0}")]
    KeyMaterial(#[from] StorageError),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("encryption failed: {0}")]
    Encrypt(String),
}
