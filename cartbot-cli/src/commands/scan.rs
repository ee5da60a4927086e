//! Scan command - inspect a raw assistant reply.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cartbot_assistant::{resolve_recommendations, scan_response};
use clap::Args;
use tokio::io::AsyncReadExt;

use crate::commands::{backend_client, load_config};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// File holding the raw reply. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Also resolve the identifiers against the backend.
    #[arg(long)]
    pub resolve: bool,
}

/// Runs the scan command.
pub async fn run(args: &ScanArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let settings = config.assistant_settings();

    let raw = read_input(args.file.as_ref()).await?;
    let scanned = scan_response(&raw, &settings.fallback_greeting);

    let resolved = if args.resolve {
        let client = backend_client(&config)?;
        Some(
            resolve_recommendations(
                &client,
                scanned.payload.identifiers(),
                settings.lookup_timeout,
            )
            .await,
        )
    } else {
        None
    };

    match cli.format {
        OutputFormat::Text => {
            let text = TextFormatter::new(cli.use_colors());
            println!("{}", text.format_scan(&scanned, resolved.as_deref()));
        }
        OutputFormat::Json => {
            let json = JsonFormatter::new(cli.pretty);
            println!("{}", json.format_scan(&scanned, resolved.as_deref())?);
        }
    }

    Ok(())
}

async fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}
