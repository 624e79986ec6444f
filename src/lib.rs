// src/lib.rs
//! envelope-key-vault: per-user envelope encryption for stored secrets
//!
//! Features:
//! - AES-256-GCM with a fresh random nonce per encryption
//! - One key per user, wrapped under a process-wide master key
//! - Race-safe get-or-create provisioning
//! - Atomic key rotation across the key record and every secret
//! - SQLite persistence, secure-gate zeroizing key material

pub mod aliases;
pub mod cache;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod db;
pub mod error;
pub mod manager;
pub mod master_key;
pub mod store;
pub mod vault;

// Re-export everything users need at the crate root
pub use aliases::{PlainText, SecretText};
pub use cache::KeyCache;
pub use config::load as load_config;
pub use crypto::{decrypt, encrypt, export_key, generate_key, import_key, Sealed, SymmetricKey};
pub use db::SqliteStore;
pub use error::{CoreError, CoreResult};
pub use manager::KeyManager;
pub use master_key::{generate_master_key, MasterKeyProvider};
pub use store::{InsertOutcome, SecretRecord, WrappedKeyRecord};
pub use vault::{SecretDraft, SecretEdit, SecretVault};
