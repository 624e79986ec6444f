// src/consts.rs
//! Shared constants: security parameters and defaults

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes (96 bits)
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes, appended to every ciphertext
pub const TAG_LEN: usize = 16;

/// Environment variable holding the base64 master key material
pub const DEFAULT_MASTER_KEY_ENV: &str = "MASTER_KEY";

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "EVK_CONFIG";

/// Default TOML config file
pub const DEFAULT_CONFIG_PATH: &str = "evk-config.toml";

/// Environment variable overriding the key-store database path
pub const STORE_DB_ENV: &str = "EVK_STORE_DB";

/// How long a SQLite handle waits on a locked database before giving up
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Random bytes in a secret record id (hex-encoded → 32 chars)
pub const SECRET_ID_BYTES: usize = 16;

/// Message shown to end users for any key or rotation failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Operation failed, please try again";
