// src/config/defaults.rs
use crate::config::app::{Features, Keys, Paths};
use crate::consts::DEFAULT_MASTER_KEY_ENV;

pub const DEFAULT_STORE_DB: &str = "data/keys.db";

pub fn default_master_key_env() -> String {
    DEFAULT_MASTER_KEY_ENV.into()
}

pub fn default_store_db() -> String {
    DEFAULT_STORE_DB.into()
}

pub fn default_keys() -> Keys {
    Keys {
        master_key_env: default_master_key_env(),
        master_key: None,
    }
}

pub fn default_paths() -> Paths {
    Paths {
        store_db: default_store_db(),
    }
}

pub fn default_features() -> Features {
    Features {
        use_dev_keys: false,
    }
}
