//! CLI handlers for `soiree settings` subcommands.
//!
//! Setting changes write the durable file only; the running process keeps
//! the snapshot it started with, so every change message says so.

use anyhow::Result;

use soiree_core::runtime::{ApiMode, RuntimeSettings, StoragePreference, settings_path};

use crate::SettingsCommands;

/// Dispatch a `SettingsCommands` variant to the appropriate handler.
pub fn run_settings_command(command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Show => cmd_show(),
        SettingsCommands::SetStorage { kind } => cmd_set_storage(kind),
        SettingsCommands::SetApi { mode, base_url } => cmd_set_api(mode, base_url),
    }
}

fn cmd_show() -> Result<()> {
    let settings = RuntimeSettings::load_or_default();

    println!("Settings file: {}", settings_path().display());
    println!("  storage.kind = {}", settings.storage_kind());
    println!("  api.mode     = {}", settings.api_mode());
    println!("  api.base_url = {}", settings.api_base_url());

    Ok(())
}

fn cmd_set_storage(kind: StoragePreference) -> Result<()> {
    let settings = RuntimeSettings::load_or_default().with_storage(kind);
    settings.save()?;

    println!("Storage backend set to {kind}.");
    println!("The change takes effect on the next run.");

    Ok(())
}

fn cmd_set_api(mode: ApiMode, base_url: Option<String>) -> Result<()> {
    if let Some(url) = &base_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("base URL must start with http:// or https://, got {url:?}");
        }
    }
    if mode == ApiMode::Rest && base_url.is_none() {
        let current = RuntimeSettings::load_or_default();
        println!("Keeping current base URL: {}", current.api_base_url());
    }

    let settings = RuntimeSettings::load_or_default().with_api(mode, base_url);
    settings.save()?;

    println!("API mode set to {mode} (base URL: {}).", settings.api_base_url());
    println!("The change takes effect on the next run.");

    Ok(())
}
