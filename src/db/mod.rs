// src/db/mod.rs
//! SQLite persistence for wrapped keys and encrypted secrets
mod conn;
mod secrets;
mod sqlite_store;
mod user_keys;

pub use conn::{open_store_db, open_store_db_in_memory};
pub use sqlite_store::SqliteStore;
