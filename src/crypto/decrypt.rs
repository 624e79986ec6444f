// src/crypto/decrypt.rs
use aes_gcm::aead::Aead;
use aes_gcm::Nonce;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{cipher_for, Sealed, SymmetricKey};
use crate::aliases::{PlainText, SecretText};
use crate::consts::{NONCE_LEN, TAG_LEN};
use crate::error::{CoreError, CoreResult};

/// Verify and open a [`Sealed`] payload
///
/// Every failure is [`CoreError::Decryption`], whichever of key, nonce or
/// ciphertext was at fault.
pub fn decrypt(sealed: &Sealed, key: &SymmetricKey) -> CoreResult<PlainText> {
    let nonce = STANDARD
        .decode(&sealed.iv)
        .map_err(|_| CoreError::Decryption)?;
    let ciphertext = STANDARD
        .decode(&sealed.ciphertext)
        .map_err(|_| CoreError::Decryption)?;

    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(CoreError::Decryption);
    }

    let plaintext = cipher_for(key)
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| CoreError::Decryption)?;
    Ok(PlainText::new(plaintext))
}

/// [`decrypt`] for UTF-8 secrets
pub fn decrypt_to_string(sealed: &Sealed, key: &SymmetricKey) -> CoreResult<SecretText> {
    let plaintext = decrypt(sealed, key)?;
    let text = std::str::from_utf8(plaintext.expose_secret())
        .map_err(|_| CoreError::Decryption)?
        .to_owned();
    Ok(SecretText::new(text))
}
