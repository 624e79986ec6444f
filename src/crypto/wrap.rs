// src/crypto/wrap.rs
//! Envelope layer: a per-user key sealed under the master key
//!
//! The wrapped payload is the base64 export of the user key, so a record
//! written by any earlier deployment keeps opening.

use super::{decrypt, encrypt, export_key, import_key, Sealed, SymmetricKey};
use crate::error::{CoreError, CoreResult};

pub fn wrap_key(user_key: &SymmetricKey, master: &SymmetricKey) -> CoreResult<Sealed> {
    let exported = export_key(user_key);
    encrypt(exported.expose_secret().as_bytes(), master)
}

/// Any failure here means the record does not belong to this master key
pub fn unwrap_key(wrapped: &Sealed, master: &SymmetricKey) -> CoreResult<SymmetricKey> {
    let exported = decrypt(wrapped, master).map_err(|_| CoreError::KeyUnwrap)?;
    let text = std::str::from_utf8(exported.expose_secret()).map_err(|_| CoreError::KeyUnwrap)?;
    import_key(text).map_err(|_| CoreError::KeyUnwrap)
}
