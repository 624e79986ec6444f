// src/config/mod.rs
//! Configuration system for envelope-key-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, Config, Features, Keys, Paths};

mod app;
mod defaults;
