// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Cartbot CLI - chat with the shopping assistant from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Ask once and print the recommendations
//! cartbot ask "I need a gift for a coffee lover"
//!
//! # Interactive chat
//! cartbot chat
//!
//! # Inspect a raw assistant reply saved to a file
//! cartbot scan reply.txt --resolve
//!
//! # Look up a single product
//! cartbot product p1 --format json --pretty
//!
//! # Write a default config file
//! cartbot config init
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ask, chat, config, product, scan};

// ============================================================================
// CLI Definition
// ============================================================================

/// Cartbot CLI - shopping assistant with product recommendations.
#[derive(Parser)]
#[command(name = "cartbot")]
#[command(about = "Shopping assistant CLI")]
#[command(long_about = r#"
Cartbot talks to a commerce backend's chat assistant and turns its replies
into readable text plus a list of recommended products.

Examples:
  cartbot ask "waterproof hiking boots"   # One question
  cartbot chat                            # Interactive session
  cartbot scan reply.txt                  # Inspect a raw reply
  cartbot product p1                      # Product details
  cartbot --format json ask "mugs"        # JSON output
"#)]
#[command(version)]
#[command(author = "Cartbot Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Send one message and print the outcome.
    #[command(visible_alias = "a")]
    Ask(ask::AskArgs),

    /// Interactive chat session.
    Chat,

    /// Scan a raw assistant reply for a checkout block.
    #[command(visible_alias = "s")]
    Scan(scan::ScanArgs),

    /// Show a single product.
    #[command(visible_alias = "p")]
    Product(product::ProductArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Backend unavailable or the assistant reported an error.
    Upstream = 2,
}

/// Failure reported by the backend or the assistant pipeline.
///
/// Maps to [`ExitCode::Upstream`].
#[derive(Debug)]
pub struct UpstreamFailure(pub String);

impl std::fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UpstreamFailure {}

impl Cli {
    /// Whether text output may use ANSI colors.
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("cartbot=debug,info")
    } else {
        EnvFilter::new("cartbot=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Ask(args) => ask::run(args, &cli).await,
        Commands::Chat => chat::run(&cli).await,
        Commands::Scan(args) => scan::run(args, &cli).await,
        Commands::Product(args) => product::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        let code = if e.downcast_ref::<UpstreamFailure>().is_some() {
            ExitCode::Upstream
        } else {
            ExitCode::Error
        };
        std::process::exit(code as i32);
    }

    Ok(())
}
