//! Product command - look up a single product.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::commands::{backend_client, load_config};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, UpstreamFailure};

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product identifier.
    pub id: String,
}

/// Runs the product command.
pub async fn run(args: &ProductArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let client = backend_client(&config)?;

    debug!(id = %args.id, base_url = %client.base_url(), "Looking up product");

    let product = client
        .get_product(&args.id)
        .await
        .map_err(|e| UpstreamFailure(e.to_string()))?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(cli.use_colors()).format_product(&product));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&product)?);
        }
    }

    Ok(())
}
