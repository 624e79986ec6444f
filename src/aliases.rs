// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret containers used throughout envelope-key-vault.
//! Everything here zeroizes on drop.

pub use secure_gate::{dynamic_alias, fixed_alias, SecureConversionsExt, SecureRandomExt};

// Fixed-size secrets
fixed_alias!(KeyBytes32, 32); // raw AES-256 key material (master or per-user)

// Dynamic secrets
dynamic_alias!(PlainText, Vec<u8>); // decrypted payload bytes
dynamic_alias!(SecretText, String); // decrypted UTF-8 secret (a stored password)
dynamic_alias!(EncodedKey, String); // base64 export of raw key material
