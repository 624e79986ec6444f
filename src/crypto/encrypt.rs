// src/crypto/encrypt.rs
use aes_gcm::aead::Aead;
use aes_gcm::Nonce;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

use super::{cipher_for, Sealed, SymmetricKey};
use crate::consts::NONCE_LEN;
use crate::error::{CoreError, CoreResult};

/// Seal `plaintext` under `key` with a nonce sampled for this call only
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> CoreResult<Sealed> {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CoreError::Encryption)?;

    Ok(Sealed {
        ciphertext: STANDARD.encode(ciphertext),
        iv: STANDARD.encode(nonce),
    })
}

#[inline]
pub fn encrypt_str(plaintext: &str, key: &SymmetricKey) -> CoreResult<Sealed> {
    encrypt(plaintext.as_bytes(), key)
}
