//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod config;
pub mod product;
pub mod scan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cartbot_assistant::ChatAssistant;
use cartbot_fetch::BackendClient;
use cartbot_store::{default_config_path, Config};
use tracing::debug;

use crate::Cli;

/// Path of the config file in effect.
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_config_path)
}

/// Loads the config file and applies command-line overrides.
pub async fn load_config(cli: &Cli) -> Result<Config> {
    let path = config_path(cli);
    let mut config = Config::load_from(&path)
        .await
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(base_url) = &cli.base_url {
        debug!(base_url = %base_url, "Overriding backend base URL");
        config.backend.base_url.clone_from(base_url);
    }

    Ok(config)
}

/// Builds a backend client from the config.
pub fn backend_client(config: &Config) -> Result<BackendClient> {
    BackendClient::new(&config.backend_settings()).context("Invalid backend configuration")
}

/// Builds the assistant over the configured backend.
pub fn assistant(config: &Config) -> Result<ChatAssistant> {
    let client = backend_client(config)?;
    Ok(ChatAssistant::with_backend(client).with_settings(config.assistant_settings()))
}
