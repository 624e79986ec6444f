// tests/support.rs
//! Test utilities: a throwaway SQLite key store per test

use std::path::{Path, PathBuf};
use std::time::Duration;

use envelope_key_vault::store::{SecretRecord, SecretStore, UserKeyStore, WrappedKeyRecord};
use envelope_key_vault::{
    generate_master_key, KeyCache, KeyManager, MasterKeyProvider, SqliteStore,
};
use rusqlite::{params, Connection};
use tempfile::TempDir;

#[allow(dead_code)] // each test binary uses a different subset
pub struct TestStore {
    dir: TempDir,
    db_path: PathBuf,
    master: String,
}

#[allow(dead_code)]
impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_path = dir.path().join("keys.db");
        let master = generate_master_key().expose_secret().clone();
        Self {
            dir,
            db_path,
            master,
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    /// A fresh manager (own connection, empty cache), like a new process
    pub fn manager(&self) -> KeyManager<SqliteStore> {
        self.manager_with_master(&self.master)
    }

    pub fn manager_with_master(&self, master: &str) -> KeyManager<SqliteStore> {
        KeyManager::new(
            MasterKeyProvider::from_encoded(master),
            KeyCache::new(),
            SqliteStore::open(&self.db_path).expect("open store"),
        )
    }

    /// Side-channel connection for inspecting or sabotaging the database
    pub fn raw_conn(&self) -> Connection {
        let conn = Connection::open(&self.db_path).expect("open raw connection");
        conn.busy_timeout(Duration::from_secs(5)).expect("busy timeout");
        conn
    }

    pub fn count_user_keys(&self, user_id: &str) -> i64 {
        self.raw_conn()
            .query_row(
                "SELECT COUNT(*) FROM user_keys WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )
            .expect("count user keys")
    }

    pub fn user_key_record(&self, user_id: &str) -> Option<WrappedKeyRecord> {
        SqliteStore::open(&self.db_path)
            .expect("open store")
            .find(user_id)
            .expect("find user key")
    }

    pub fn secrets_of(&self, owner: &str) -> Vec<SecretRecord> {
        SqliteStore::open(&self.db_path)
            .expect("open store")
            .list_by_owner(owner)
            .expect("list secrets")
    }

    /// Make every UPDATE of this secret row fail inside SQLite
    pub fn fail_updates_on(&self, secret_id: &str) {
        self.raw_conn()
            .execute_batch(&format!(
                "CREATE TRIGGER fail_secret_update BEFORE UPDATE ON secrets
                 WHEN OLD.id = '{secret_id}'
                 BEGIN SELECT RAISE(ABORT, 'simulated write failure'); END;"
            ))
            .expect("create failure trigger");
    }

    pub fn clear_failures(&self) {
        self.raw_conn()
            .execute_batch("DROP TRIGGER IF EXISTS fail_secret_update;")
            .expect("drop failure trigger");
    }

    pub fn overwrite_ciphertext(&self, secret_id: &str, ciphertext: &str) {
        self.raw_conn()
            .execute(
                "UPDATE secrets SET ciphertext = ?2 WHERE id = ?1",
                params![secret_id, ciphertext],
            )
            .expect("overwrite ciphertext");
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}
