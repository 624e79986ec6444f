// src/bin/gen_master_key.rs
//! Print fresh master key material, or check the configured one
//!
//!   gen_master_key           → MASTER_KEY=<base64>
//!   gen_master_key --check   → verify the configured master key loads

use anyhow::{Context, Result};
use envelope_key_vault::{generate_master_key, load_config, MasterKeyProvider};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if std::env::args().any(|arg| arg == "--check") {
        let config = load_config().context("failed to load configuration")?;
        MasterKeyProvider::from_config(config)
            .ensure_loaded()
            .with_context(|| format!("{} is missing or invalid", config.keys.master_key_env))?;
        info!(var = %config.keys.master_key_env, "master key OK");
        return Ok(());
    }

    let key = generate_master_key();
    println!("MASTER_KEY={}", key.expose_secret());
    info!("store this value in your secret manager; it cannot be recovered");
    Ok(())
}
