// src/manager/provision.rs
use tracing::{debug, info};

use super::KeyManager;
use crate::crypto::{generate_key, unwrap_key, wrap_key, SymmetricKey};
use crate::error::{CoreError, CoreResult};
use crate::store::{InsertOutcome, SecretStore, UnitOfWork, UserKeyStore};

impl<S> KeyManager<S>
where
    S: UserKeyStore + SecretStore + UnitOfWork,
{
    /// Create a key for a user with no record; the storage uniqueness
    /// constraint picks the winner when several callers race
    pub(super) fn provision(&self, user_id: &str) -> CoreResult<SymmetricKey> {
        let master = self.master.master_key()?;
        let candidate = generate_key();
        let wrapped = wrap_key(&candidate, &master)?;

        match self.store.insert_if_absent(user_id, &wrapped)? {
            InsertOutcome::Inserted => {
                info!(user_id, "provisioned user key");
                Ok(candidate)
            }
            InsertOutcome::AlreadyExists => {
                debug!(user_id, "lost key provisioning race, loading winner");
                let record = self
                    .store
                    .find(user_id)?
                    .ok_or_else(|| CoreError::KeyRecordMissing(user_id.to_owned()))?;
                unwrap_key(&record.wrapped, &master)
            }
        }
    }

    /// Explicit provisioning; errors if the user already has a key
    pub fn create_user_key(&self, user_id: &str) -> CoreResult<SymmetricKey> {
        self.with_user_read(user_id, || self.create_unlocked(user_id))
    }

    fn create_unlocked(&self, user_id: &str) -> CoreResult<SymmetricKey> {
        if self.store.find(user_id)?.is_some() {
            return Err(CoreError::KeyAlreadyExists(user_id.to_owned()));
        }

        let master = self.master.master_key()?;
        let key = generate_key();
        let wrapped = wrap_key(&key, &master)?;

        match self.store.insert_if_absent(user_id, &wrapped)? {
            InsertOutcome::Inserted => {
                info!(user_id, "created user key");
                Ok(self.cache.get_or_insert(user_id, key))
            }
            InsertOutcome::AlreadyExists => Err(CoreError::KeyAlreadyExists(user_id.to_owned())),
        }
    }
}
