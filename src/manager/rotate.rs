// src/manager/rotate.rs
//! Atomic per-user key rotation
//!
//! Every secret is sealed under the user key alone, so a rotation rewrites
//! each one. The key record and all secrets change in one transaction;
//! a failure anywhere leaves both exactly as they were.

use std::sync::PoisonError;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::KeyManager;
use crate::crypto::{decrypt, encrypt, generate_key, wrap_key, SymmetricKey};
use crate::error::{CoreError, CoreResult};
use crate::store::{SecretStore, UnitOfWork, UserKeyStore};

impl<S> KeyManager<S>
where
    S: UserKeyStore + SecretStore + UnitOfWork,
{
    /// Replace the user's key and re-encrypt every secret they own
    ///
    /// Any failure is reported as [`CoreError::RotationFailed`]; nothing was
    /// committed and the cache is untouched, so the call can be retried.
    pub fn rotate_user_key(&self, user_id: &str) -> CoreResult<SymmetricKey> {
        self.rotate(user_id, None)
    }

    /// [`Self::rotate_user_key`], abandoned once `deadline` passes
    pub fn rotate_user_key_until(&self, user_id: &str, deadline: Instant) -> CoreResult<SymmetricKey> {
        self.rotate(user_id, Some(deadline))
    }

    fn rotate(&self, user_id: &str, deadline: Option<Instant>) -> CoreResult<SymmetricKey> {
        // Held until the cache is updated: a second rotation that commits
        // after ours must also be the last to write the cache
        let lock = self.user_lock(user_id);
        let _exclusive = lock.write().unwrap_or_else(PoisonError::into_inner);

        info!(user_id, "rotating user key");
        match self.rotate_in_transaction(user_id, deadline) {
            Ok((new_key, rewritten)) => {
                self.cache.replace(user_id, new_key.clone());
                info!(user_id, secrets = rewritten, "user key rotated");
                Ok(new_key)
            }
            Err(err) => {
                warn!(user_id, error = %err, "key rotation aborted, nothing committed");
                Err(CoreError::RotationFailed(Box::new(err)))
            }
        }
    }

    fn rotate_in_transaction(
        &self,
        user_id: &str,
        deadline: Option<Instant>,
    ) -> CoreResult<(SymmetricKey, usize)> {
        // Provisions on first use so there is always a record to replace
        self.cached_or_load(user_id)?;

        let master = self.master.master_key()?;
        let new_key = generate_key();
        let wrapped = wrap_key(&new_key, &master)?;

        let rewritten = self.store.in_transaction(|tx| {
            // Re-read under the write lock: the cache may predate another rotation
            let old_key = self.stored_key(tx, user_id)?;
            let secrets = tx.list_by_owner(user_id)?;
            debug!(user_id, secrets = secrets.len(), "re-encrypting secrets");

            tx.update_user_key(user_id, &wrapped)?;
            for secret in &secrets {
                check_deadline(deadline)?;
                let plaintext = decrypt(&secret.sealed, &old_key)?;
                let resealed = encrypt(plaintext.expose_secret(), &new_key)?;
                tx.update_ciphertext(&secret.id, &resealed)?;
            }
            check_deadline(deadline)?;

            Ok(secrets.len())
        })?;

        Ok((new_key, rewritten))
    }
}

fn check_deadline(deadline: Option<Instant>) -> CoreResult<()> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(CoreError::DeadlineExceeded),
        _ => Ok(()),
    }
}
