// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

use crate::consts::GENERIC_FAILURE_MESSAGE;

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Master key config is missing or malformed. Startup-fatal.
    #[error("master key unavailable: {0}")]
    MasterKeyUnavailable(String),

    /// A wrapped user key did not open under the current master key.
    #[error("failed to unwrap user key")]
    KeyUnwrap,

    /// Wrong key, tampered ciphertext and corrupted nonce all land here.
    #[error("decryption failed")]
    Decryption,

    #[error("encryption failed")]
    Encryption,

    #[error("invalid key material")]
    InvalidKeyMaterial,

    /// The key record vanished between provisioning and use.
    #[error("no encryption key record for user {0}")]
    KeyRecordMissing(String),

    #[error("user {0} already has an encryption key")]
    KeyAlreadyExists(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Nothing was committed; safe to retry.
    #[error("key rotation failed: {0}")]
    RotationFailed(#[source] Box<CoreError>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl CoreError {
    /// Text safe to show an end user. Never echoes cryptographic detail.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }

    /// Whether repeating the same call can succeed without outside intervention
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::RotationFailed(_) | CoreError::DeadlineExceeded)
    }
}
