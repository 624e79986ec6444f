// src/crypto/key.rs
//! Key generation and raw-key serialization

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::aliases::{EncodedKey, KeyBytes32, SecureRandomExt};
use crate::consts::KEY_LEN;
use crate::error::{CoreError, CoreResult};

/// Opaque handle to 256 bits of AES-GCM key material
///
/// Clones share one zeroizing allocation. The bytes are only reachable
/// through [`export_key`].
#[derive(Clone)]
pub struct SymmetricKey {
    inner: Arc<KeyBytes32>,
}

impl SymmetricKey {
    fn from_bytes(bytes: KeyBytes32) -> Self {
        Self {
            inner: Arc::new(bytes),
        }
    }

    pub(crate) fn material(&self) -> &[u8; KEY_LEN] {
        self.inner.expose_secret()
    }

    /// Constant-time comparison of key material
    pub fn same_material(&self, other: &SymmetricKey) -> bool {
        let diff = self
            .material()
            .iter()
            .zip(other.material().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff == 0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Generate a new random 256-bit key from the OS-backed CSPRNG
#[inline]
pub fn generate_key() -> SymmetricKey {
    SymmetricKey::from_bytes(KeyBytes32::random())
}

/// Raw key bytes as standard padded base64
pub fn export_key(key: &SymmetricKey) -> EncodedKey {
    EncodedKey::new(STANDARD.encode(key.material()))
}

/// Inverse of [`export_key`]; rejects anything that is not exactly 32 bytes
pub fn import_key(encoded: &str) -> CoreResult<SymmetricKey> {
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| CoreError::InvalidKeyMaterial)?;
    let bytes: [u8; KEY_LEN] = decoded
        .as_slice()
        .try_into()
        .map_err(|_| CoreError::InvalidKeyMaterial)?;
    Ok(SymmetricKey::from_bytes(KeyBytes32::new(bytes)))
}
