// src/db/conn.rs
use std::path::Path;
use std::time::Duration;
use std::fs;

use rusqlite::{Connection, Result};

use crate::consts::DB_BUSY_TIMEOUT_MS;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS user_keys (
        user_id     TEXT PRIMARY KEY,
        wrapped_key TEXT NOT NULL,
        wrap_iv     TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS secrets (
        id            TEXT PRIMARY KEY,
        owner_user_id TEXT NOT NULL,
        name          TEXT NOT NULL,
        username      TEXT,
        url           TEXT,
        client_id     TEXT,
        service_id    TEXT,
        ciphertext    TEXT NOT NULL,
        iv            TEXT NOT NULL,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_secrets_owner ON secrets(owner_user_id);
"#;

/// Open (creating if needed) the key-store database at `db_path`
pub fn open_store_db<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    if let Some(parent) = db_path.as_ref().parent() {
        let _ = fs::create_dir_all(parent);
    }

    let conn = Connection::open(db_path)?;
    // Set before the schema batch so concurrent openers wait instead of failing
    conn.busy_timeout(Duration::from_millis(DB_BUSY_TIMEOUT_MS))?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

pub fn open_store_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
