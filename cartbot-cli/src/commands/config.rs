//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use cartbot_store::{default_config_dir, Config};
use tracing::info;

use crate::commands::{config_path, load_config};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force } => init_config(*force, cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;

    match cli.format {
        OutputFormat::Text => {
            let token_set = config.backend_settings().api_token.is_some();

            println!("Cartbot Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Backend URL:     {}", config.backend.base_url);
            println!("Timeout:         {}s", config.backend.timeout_secs);
            println!("Max attempts:    {}", config.backend.max_attempts);
            println!(
                "API token:       ${} ({})",
                config.backend.api_token_env,
                if token_set { "set" } else { "not set" }
            );
            if !config.backend.allowed_domains.is_empty() {
                println!("Allowed domains: {}", config.backend.allowed_domains.join(", "));
            }
            println!();
            match config.assistant.lookup_timeout_secs {
                0 => println!("Lookup timeout:  none"),
                secs => println!("Lookup timeout:  {secs}s"),
            }
            if let Some(greeting) = &config.assistant.fallback_greeting {
                println!("Greeting:        {greeting}");
            }
            println!("History limit:   {}", config.general.history_limit);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_file = config_path(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_file.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = config_path(cli);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = Config::default();
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url.clone_from(base_url);
    }
    config.save_to(&path).await?;

    info!(path = %path.display(), "Config initialized");
    if !cli.quiet {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
