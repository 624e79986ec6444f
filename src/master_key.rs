// src/master_key.rs
//! Process-wide master key
//!
//! Loaded from configuration on first use and memoized for the provider's
//! lifetime. Nothing in this crate ever persists it.

use std::sync::OnceLock;

use tracing::info;

use crate::aliases::EncodedKey;
use crate::config::Config;
use crate::crypto::{export_key, generate_key, import_key, SymmetricKey};
use crate::error::{CoreError, CoreResult};

enum MasterKeySource {
    Env {
        var: String,
        dev_fallback: Option<EncodedKey>,
    },
    Inline(EncodedKey),
}

pub struct MasterKeyProvider {
    source: MasterKeySource,
    key: OnceLock<SymmetricKey>,
}

impl MasterKeyProvider {
    /// Read from the environment variable named in `config.keys`
    ///
    /// The inline `keys.master_key` is a fallback only when
    /// `features.use_dev_keys` is set.
    pub fn from_config(config: &Config) -> Self {
        let dev_fallback = if config.features.use_dev_keys {
            config.keys.master_key.clone().map(EncodedKey::new)
        } else {
            None
        };
        Self {
            source: MasterKeySource::Env {
                var: config.keys.master_key_env.clone(),
                dev_fallback,
            },
            key: OnceLock::new(),
        }
    }

    /// Default config: `MASTER_KEY`, no dev fallback
    pub fn from_env() -> Self {
        Self::from_config(&Config::default())
    }

    /// Explicit base64 material, validated on first use
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            source: MasterKeySource::Inline(EncodedKey::new(encoded.into())),
            key: OnceLock::new(),
        }
    }

    pub fn master_key(&self) -> CoreResult<SymmetricKey> {
        if let Some(key) = self.key.get() {
            return Ok(key.clone());
        }
        let key = self.load()?;
        Ok(self.key.get_or_init(|| key).clone())
    }

    /// Force the load so misconfiguration fails at startup, not mid-request
    pub fn ensure_loaded(&self) -> CoreResult<()> {
        self.master_key().map(|_| ())
    }

    fn load(&self) -> CoreResult<SymmetricKey> {
        let key = match &self.source {
            MasterKeySource::Inline(encoded) => import_key(encoded.expose_secret()).map_err(|_| {
                CoreError::MasterKeyUnavailable("inline master key is not 32 bytes of base64".into())
            })?,
            MasterKeySource::Env { var, dev_fallback } => {
                let imported = match std::env::var(var) {
                    Ok(value) if !value.trim().is_empty() => {
                        let encoded = EncodedKey::new(value);
                        import_key(encoded.expose_secret())
                    }
                    _ => match dev_fallback {
                        Some(dev) => import_key(dev.expose_secret()),
                        None => {
                            return Err(CoreError::MasterKeyUnavailable(format!(
                                "{var} environment variable is not set"
                            )))
                        }
                    },
                };
                imported.map_err(|_| {
                    CoreError::MasterKeyUnavailable(format!(
                        "{var} must hold 32 bytes of standard base64"
                    ))
                })?
            }
        };
        info!("master key loaded");
        Ok(key)
    }
}

/// Fresh base64 master key material for provisioning a deployment
pub fn generate_master_key() -> EncodedKey {
    export_key(&generate_key())
}
