// src/db/sqlite_store.rs
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, TransactionBehavior};

use super::{conn, secrets, user_keys};
use crate::config::Config;
use crate::crypto::Sealed;
use crate::error::{CoreError, CoreResult};
use crate::store::{
    InsertOutcome, NewSecret, SecretPatch, SecretRecord, SecretStore, StoreWriter, UnitOfWork,
    UserKeyStore, WrappedKeyRecord,
};

/// One SQLite connection behind a mutex
///
/// Open several handles on the same file to get concurrent access; SQLite's
/// own locking arbitrates between them.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> CoreResult<Self> {
        Ok(Self::from_connection(conn::open_store_db(db_path)?))
    }

    pub fn open_in_memory() -> CoreResult<Self> {
        Ok(Self::from_connection(conn::open_store_db_in_memory()?))
    }

    /// `paths.store_db` from config (already overridden by `EVK_STORE_DB`)
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        Self::open(&config.paths.store_db)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    // A panic mid-transaction already rolled back, so the connection is still sound
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserKeyStore for SqliteStore {
    fn find(&self, user_id: &str) -> CoreResult<Option<WrappedKeyRecord>> {
        Ok(user_keys::find_user_key(&self.conn(), user_id)?)
    }

    fn insert_if_absent(&self, user_id: &str, wrapped: &Sealed) -> CoreResult<InsertOutcome> {
        Ok(user_keys::insert_user_key_if_absent(
            &self.conn(),
            user_id,
            wrapped,
        )?)
    }
}

impl SecretStore for SqliteStore {
    fn list_by_owner(&self, owner_user_id: &str) -> CoreResult<Vec<SecretRecord>> {
        Ok(secrets::list_secrets_by_owner(&self.conn(), owner_user_id)?)
    }

    fn find_owned(&self, owner_user_id: &str, id: &str) -> CoreResult<Option<SecretRecord>> {
        Ok(secrets::find_owned_secret(&self.conn(), owner_user_id, id)?)
    }

    fn delete_owned(&self, owner_user_id: &str, id: &str) -> CoreResult<bool> {
        Ok(secrets::delete_owned_secret(&self.conn(), owner_user_id, id)?)
    }
}

impl UnitOfWork for SqliteStore {
    fn in_transaction<T, F>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&dyn StoreWriter) -> CoreResult<T>,
    {
        let mut conn = self.conn();
        // IMMEDIATE takes the write lock up front: no other handle can slip a
        // write in between our reads and our updates
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        // Dropping `tx` on the error path rolls back
        let value = f(&SqliteWriter { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }
}

struct SqliteWriter<'a> {
    conn: &'a Connection,
}

impl StoreWriter for SqliteWriter<'_> {
    fn find_user_key(&self, user_id: &str) -> CoreResult<Option<WrappedKeyRecord>> {
        Ok(user_keys::find_user_key(self.conn, user_id)?)
    }

    fn list_by_owner(&self, owner_user_id: &str) -> CoreResult<Vec<SecretRecord>> {
        Ok(secrets::list_secrets_by_owner(self.conn, owner_user_id)?)
    }

    fn update_user_key(&self, user_id: &str, wrapped: &Sealed) -> CoreResult<()> {
        if !user_keys::update_user_key(self.conn, user_id, wrapped)? {
            return Err(CoreError::KeyRecordMissing(user_id.to_owned()));
        }
        Ok(())
    }

    fn update_ciphertext(&self, id: &str, sealed: &Sealed) -> CoreResult<()> {
        Ok(secrets::update_ciphertext(self.conn, id, sealed)?)
    }

    fn insert_secret(&self, secret: &NewSecret) -> CoreResult<SecretRecord> {
        Ok(secrets::insert_secret(self.conn, secret)?)
    }

    fn update_secret(
        &self,
        owner_user_id: &str,
        id: &str,
        patch: &SecretPatch,
    ) -> CoreResult<Option<SecretRecord>> {
        Ok(secrets::update_owned_secret(
            self.conn,
            owner_user_id,
            id,
            patch,
        )?)
    }
}
