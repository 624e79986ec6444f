// src/db/secrets.rs
//! Row-level operations on `secrets`

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::crypto::Sealed;
use crate::store::{NewSecret, SecretPatch, SecretRecord};

const SECRET_COLUMNS: &str = "id, owner_user_id, name, username, url, client_id, service_id, \
     ciphertext, iv, created_at, updated_at";

fn secret_from_row(row: &Row<'_>) -> rusqlite::Result<SecretRecord> {
    Ok(SecretRecord {
        id: row.get(0)?,
        owner_user_id: row.get(1)?,
        name: row.get(2)?,
        username: row.get(3)?,
        url: row.get(4)?,
        client_id: row.get(5)?,
        service_id: row.get(6)?,
        sealed: Sealed::new(row.get::<_, String>(7)?, row.get::<_, String>(8)?),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub fn list_secrets_by_owner(conn: &Connection, owner: &str) -> rusqlite::Result<Vec<SecretRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SECRET_COLUMNS} FROM secrets WHERE owner_user_id = ?1 ORDER BY created_at, id"
    ))?;
    let secrets = stmt
        .query_map([owner], secret_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(secrets)
}

pub fn find_owned_secret(
    conn: &Connection,
    owner: &str,
    id: &str,
) -> rusqlite::Result<Option<SecretRecord>> {
    conn.query_row(
        &format!("SELECT {SECRET_COLUMNS} FROM secrets WHERE id = ?1 AND owner_user_id = ?2"),
        params![id, owner],
        secret_from_row,
    )
    .optional()
}

pub fn insert_secret(conn: &Connection, secret: &NewSecret) -> rusqlite::Result<SecretRecord> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO secrets (
            id, owner_user_id, name, username, url, client_id, service_id,
            ciphertext, iv, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            secret.id,
            secret.owner_user_id,
            secret.name,
            secret.username,
            secret.url,
            secret.client_id,
            secret.service_id,
            secret.sealed.ciphertext,
            secret.sealed.iv,
            now,
        ],
    )?;
    Ok(SecretRecord {
        id: secret.id.clone(),
        owner_user_id: secret.owner_user_id.clone(),
        name: secret.name.clone(),
        username: secret.username.clone(),
        url: secret.url.clone(),
        client_id: secret.client_id.clone(),
        service_id: secret.service_id.clone(),
        sealed: secret.sealed.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn update_ciphertext(conn: &Connection, id: &str, sealed: &Sealed) -> rusqlite::Result<()> {
    let updated = conn.execute(
        "UPDATE secrets SET ciphertext = ?2, iv = ?3, updated_at = ?4 WHERE id = ?1",
        params![id, sealed.ciphertext, sealed.iv, Utc::now()],
    )?;
    if updated == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}

pub fn update_owned_secret(
    conn: &Connection,
    owner: &str,
    id: &str,
    patch: &SecretPatch,
) -> rusqlite::Result<Option<SecretRecord>> {
    let (ciphertext, iv) = match &patch.sealed {
        Some(sealed) => (Some(&sealed.ciphertext), Some(&sealed.iv)),
        None => (None, None),
    };
    let updated = conn.execute(
        "UPDATE secrets SET
            name       = COALESCE(?3, name),
            username   = COALESCE(?4, username),
            url        = COALESCE(?5, url),
            client_id  = COALESCE(?6, client_id),
            service_id = COALESCE(?7, service_id),
            ciphertext = COALESCE(?8, ciphertext),
            iv         = COALESCE(?9, iv),
            updated_at = ?10
         WHERE id = ?1 AND owner_user_id = ?2",
        params![
            id,
            owner,
            patch.name,
            patch.username,
            patch.url,
            patch.client_id,
            patch.service_id,
            ciphertext,
            iv,
            Utc::now(),
        ],
    )?;
    if updated == 0 {
        return Ok(None);
    }
    find_owned_secret(conn, owner, id)
}

pub fn delete_owned_secret(conn: &Connection, owner: &str, id: &str) -> rusqlite::Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM secrets WHERE id = ?1 AND owner_user_id = ?2",
        params![id, owner],
    )?;
    Ok(deleted > 0)
}
