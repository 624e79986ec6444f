// src/vault.rs
//! Secret records for one owner: store, reveal, edit, delete
//!
//! The glue a request handler needs around [`KeyManager`]. Writes fetch the
//! owner's key from inside the write transaction, never from the cache.

use std::sync::Arc;

use rand::RngCore;
use tracing::debug;

use crate::aliases::SecretText;
use crate::consts::SECRET_ID_BYTES;
use crate::crypto::{decrypt_to_string, encrypt_str};
use crate::error::CoreResult;
use crate::manager::KeyManager;
use crate::store::{NewSecret, SecretPatch, SecretRecord, SecretStore, UnitOfWork, UserKeyStore};

/// Input for [`SecretVault::store_secret`]
#[derive(Debug, Clone, Default)]
pub struct SecretDraft {
    pub name: String,
    pub username: Option<String>,
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub service_id: Option<String>,
}

/// Changes for [`SecretVault::update_secret`]; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct SecretEdit {
    pub name: Option<String>,
    pub username: Option<String>,
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub plaintext: Option<String>,
}

pub struct SecretVault<S> {
    manager: Arc<KeyManager<S>>,
}

impl<S> Clone for SecretVault<S> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<S> SecretVault<S>
where
    S: UserKeyStore + SecretStore + UnitOfWork,
{
    pub fn new(manager: Arc<KeyManager<S>>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &KeyManager<S> {
        &self.manager
    }

    pub fn store_secret(
        &self,
        owner: &str,
        draft: SecretDraft,
        plaintext: &str,
    ) -> CoreResult<SecretRecord> {
        // Make sure a key record exists before taking the write lock
        self.manager.user_key(owner)?;

        let record = self.manager.store().in_transaction(|tx| {
            let key = self.manager.stored_key(tx, owner)?;
            let sealed = encrypt_str(plaintext, &key)?;
            tx.insert_secret(&NewSecret {
                id: new_secret_id(),
                owner_user_id: owner.to_owned(),
                name: draft.name,
                username: draft.username,
                url: draft.url,
                client_id: draft.client_id,
                service_id: draft.service_id,
                sealed,
            })
        })?;
        debug!(owner, secret_id = %record.id, "stored secret");
        Ok(record)
    }

    /// `None` when the secret does not exist or belongs to someone else
    ///
    /// Record and key are read while no rotation of `owner` is in flight, so
    /// both come from the same side of it.
    pub fn reveal_secret(&self, owner: &str, id: &str) -> CoreResult<Option<SecretText>> {
        self.manager.with_user_read(owner, || -> CoreResult<Option<SecretText>> {
            let Some(record) = self.manager.store().find_owned(owner, id)? else {
                return Ok(None);
            };
            let key = self.manager.cached_or_load(owner)?;
            decrypt_to_string(&record.sealed, &key).map(Some)
        })
    }

    /// Metadata only; ciphertexts stay sealed
    pub fn list_secrets(&self, owner: &str) -> CoreResult<Vec<SecretRecord>> {
        self.manager.store().list_by_owner(owner)
    }

    pub fn update_secret(
        &self,
        owner: &str,
        id: &str,
        edit: SecretEdit,
    ) -> CoreResult<Option<SecretRecord>> {
        if edit.plaintext.is_some() {
            // Nothing to re-seal, and no key to provision, for a missing secret
            if self.manager.store().find_owned(owner, id)?.is_none() {
                return Ok(None);
            }
            self.manager.user_key(owner)?;
        }

        self.manager.store().in_transaction(|tx| {
            let sealed = match &edit.plaintext {
                Some(plaintext) => {
                    let key = self.manager.stored_key(tx, owner)?;
                    Some(encrypt_str(plaintext, &key)?)
                }
                None => None,
            };
            tx.update_secret(
                owner,
                id,
                &SecretPatch {
                    name: edit.name,
                    username: edit.username,
                    url: edit.url,
                    client_id: edit.client_id,
                    service_id: edit.service_id,
                    sealed,
                },
            )
        })
    }

    pub fn delete_secret(&self, owner: &str, id: &str) -> CoreResult<bool> {
        self.manager.store().delete_owned(owner, id)
    }
}

fn new_secret_id() -> String {
    let mut bytes = [0u8; SECRET_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
