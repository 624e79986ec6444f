// src/db/user_keys.rs
//! Row-level operations on `user_keys`

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::crypto::Sealed;
use crate::store::{InsertOutcome, WrappedKeyRecord};

fn user_key_from_row(row: &Row<'_>) -> rusqlite::Result<WrappedKeyRecord> {
    Ok(WrappedKeyRecord {
        user_id: row.get(0)?,
        wrapped: Sealed::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub fn find_user_key(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<WrappedKeyRecord>> {
    conn.query_row(
        "SELECT user_id, wrapped_key, wrap_iv, created_at, updated_at
         FROM user_keys WHERE user_id = ?1",
        [user_id],
        user_key_from_row,
    )
    .optional()
}

/// The primary key decides races: a losing insert is ignored, not an error
pub fn insert_user_key_if_absent(
    conn: &Connection,
    user_id: &str,
    wrapped: &Sealed,
) -> rusqlite::Result<InsertOutcome> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO user_keys (user_id, wrapped_key, wrap_iv, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![user_id, wrapped.ciphertext, wrapped.iv, Utc::now()],
    )?;
    Ok(if inserted == 1 {
        InsertOutcome::Inserted
    } else {
        InsertOutcome::AlreadyExists
    })
}

/// `false` when the user has no record to replace
pub fn update_user_key(conn: &Connection, user_id: &str, wrapped: &Sealed) -> rusqlite::Result<bool> {
    let updated = conn.execute(
        "UPDATE user_keys SET wrapped_key = ?2, wrap_iv = ?3, updated_at = ?4
         WHERE user_id = ?1",
        params![user_id, wrapped.ciphertext, wrapped.iv, Utc::now()],
    )?;
    Ok(updated > 0)
}
