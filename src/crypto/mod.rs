// src/crypto/mod.rs
//! Pure cryptographic operations: no I/O, no database
//!
//! AES-256-GCM with a fresh random 96-bit nonce per call. Ciphertexts and
//! nonces leave this module as base64 text, ready to persist.
mod decrypt;
mod encrypt;
mod key;
mod wrap;

pub use decrypt::{decrypt, decrypt_to_string};
pub use encrypt::{encrypt, encrypt_str};
pub use key::{export_key, generate_key, import_key, SymmetricKey};
pub use wrap::{unwrap_key, wrap_key};

use aes_gcm::aead::KeyInit;
use aes_gcm::{Aes256Gcm, Key};
use serde::{Deserialize, Serialize};

/// Ciphertext (tag appended) and the nonce it was sealed under, both base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sealed {
    pub ciphertext: String,
    pub iv: String,
}

impl Sealed {
    pub fn new(ciphertext: impl Into<String>, iv: impl Into<String>) -> Self {
        Self {
            ciphertext: ciphertext.into(),
            iv: iv.into(),
        }
    }
}

fn cipher_for(key: &SymmetricKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.material()))
}
