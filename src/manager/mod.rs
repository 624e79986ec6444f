// src/manager/mod.rs
//! Per-user key orchestration: get-or-create, caching and rotation
//!
//! Per user the lifecycle is
//! `NoKey → provision → Cached ⇄ evict → Persisted → reload → Cached`,
//! and `Cached → rotate → Cached` with a new key.
//!
//! Each user has an in-process `RwLock`. Rotation holds it exclusively from
//! its transaction through the cache update; cache misses and reveals hold it
//! shared. The cache therefore never ends up behind the committed key.

mod provision;
mod rotate;

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use tracing::debug;

use crate::cache::KeyCache;
use crate::crypto::{unwrap_key, SymmetricKey};
use crate::error::{CoreError, CoreResult};
use crate::master_key::MasterKeyProvider;
use crate::store::{SecretStore, StoreWriter, UnitOfWork, UserKeyStore};

/// Share one instance (behind an `Arc`) across every request handler
pub struct KeyManager<S> {
    master: MasterKeyProvider,
    cache: KeyCache,
    store: S,
    user_locks: DashMap<String, Arc<RwLock<()>>>,
}

impl<S> KeyManager<S>
where
    S: UserKeyStore + SecretStore + UnitOfWork,
{
    pub fn new(master: MasterKeyProvider, cache: KeyCache, store: S) -> Self {
        Self {
            master,
            cache,
            store,
            user_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }

    /// The user's key, provisioning one on first access
    ///
    /// Fails with [`CoreError::KeyUnwrap`] when the stored record does not
    /// open under the current master key. A new key is never generated over
    /// an existing record.
    pub fn user_key(&self, user_id: &str) -> CoreResult<SymmetricKey> {
        if let Some(key) = self.cache.get(user_id) {
            return Ok(key);
        }
        self.with_user_read(user_id, || self.cached_or_load(user_id))
    }

    /// Drop one user's cached key, or every cached key when `None`
    pub fn invalidate_cache(&self, user_id: Option<&str>) {
        match user_id {
            Some(user_id) => {
                debug!(user_id, "invalidating cached user key");
                self.cache.invalidate(user_id);
            }
            None => {
                debug!(entries = self.cache.len(), "clearing user key cache");
                self.cache.clear();
            }
        }
    }

    /// Run `f` while no rotation of this user can start or finish
    ///
    /// `f` must not call [`Self::user_key`] or rotate; use
    /// [`Self::cached_or_load`] instead.
    pub(crate) fn with_user_read<T>(&self, user_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.user_lock(user_id);
        let _shared = lock.read().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// [`Self::user_key`] without taking the user lock; the caller holds it
    pub(crate) fn cached_or_load(&self, user_id: &str) -> CoreResult<SymmetricKey> {
        if let Some(key) = self.cache.get(user_id) {
            return Ok(key);
        }

        let key = match self.store.find(user_id)? {
            Some(record) => unwrap_key(&record.wrapped, &self.master.master_key()?)?,
            None => self.provision(user_id)?,
        };

        Ok(self.cache.get_or_insert(user_id, key))
    }

    /// Authoritative key as stored, read through an open transaction
    ///
    /// Skips the cache so writes made under the transaction's lock can never
    /// use a key that a concurrent rotation just replaced.
    pub(crate) fn stored_key(&self, tx: &dyn StoreWriter, user_id: &str) -> CoreResult<SymmetricKey> {
        let record = tx
            .find_user_key(user_id)?
            .ok_or_else(|| CoreError::KeyRecordMissing(user_id.to_owned()))?;
        unwrap_key(&record.wrapped, &self.master.master_key()?)
    }

    fn user_lock(&self, user_id: &str) -> Arc<RwLock<()>> {
        Arc::clone(self.user_locks.entry(user_id.to_owned()).or_default().value())
    }
}
