// src/store.rs
//! Persistence contracts consumed by the key manager
//!
//! Pure data access, no encryption. [`crate::db::SqliteStore`] is the
//! shipped implementation.

use chrono::{DateTime, Utc};

use crate::crypto::Sealed;
use crate::error::CoreResult;

/// One row per user: their key, sealed under the master key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKeyRecord {
    pub user_id: String,
    pub wrapped: Sealed,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored secret, sealed under its owner's key
///
/// `client_id` and `service_id` group secrets for display; they are plain
/// metadata and never encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub username: Option<String>,
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub sealed: Sealed,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSecret {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub username: Option<String>,
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub sealed: Sealed,
}

/// Fields left as `None` keep their stored value
#[derive(Debug, Clone, Default)]
pub struct SecretPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub sealed: Option<Sealed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another writer got there first; the existing row was left alone
    AlreadyExists,
}

pub trait UserKeyStore: Send + Sync {
    fn find(&self, user_id: &str) -> CoreResult<Option<WrappedKeyRecord>>;

    /// Never overwrites an existing row
    fn insert_if_absent(&self, user_id: &str, wrapped: &Sealed) -> CoreResult<InsertOutcome>;
}

pub trait SecretStore: Send + Sync {
    fn list_by_owner(&self, owner_user_id: &str) -> CoreResult<Vec<SecretRecord>>;

    fn find_owned(&self, owner_user_id: &str, id: &str) -> CoreResult<Option<SecretRecord>>;

    /// `false` when no such secret exists for this owner
    fn delete_owned(&self, owner_user_id: &str, id: &str) -> CoreResult<bool>;
}

/// Writes that must commit together or not at all
pub trait StoreWriter {
    fn find_user_key(&self, user_id: &str) -> CoreResult<Option<WrappedKeyRecord>>;

    fn list_by_owner(&self, owner_user_id: &str) -> CoreResult<Vec<SecretRecord>>;

    fn update_user_key(&self, user_id: &str, wrapped: &Sealed) -> CoreResult<()>;

    fn update_ciphertext(&self, id: &str, sealed: &Sealed) -> CoreResult<()>;

    fn insert_secret(&self, secret: &NewSecret) -> CoreResult<SecretRecord>;

    fn update_secret(
        &self,
        owner_user_id: &str,
        id: &str,
        patch: &SecretPatch,
    ) -> CoreResult<Option<SecretRecord>>;
}

pub trait UnitOfWork: Send + Sync {
    /// Run `f` inside one transaction; commit iff it returns `Ok`
    fn in_transaction<T, F>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&dyn StoreWriter) -> CoreResult<T>;
}
