//! Ask command - send one message through the assistant.

use anyhow::Result;
use cartbot_core::Resource;
use clap::Args;
use futures::StreamExt;
use tracing::info;

use crate::commands::{assistant, load_config};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, UpstreamFailure};

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// Message to send. Multiple words are joined with spaces.
    #[arg(required = true)]
    pub message: Vec<String>,
}

/// Runs the ask command.
pub async fn run(args: &AskArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let assistant = assistant(&config)?;
    let message = args.message.join(" ");

    info!(len = message.len(), "Asking assistant");

    let text = TextFormatter::new(cli.use_colors());
    let mut outcomes = assistant.process_message(message);
    let mut terminal = None;

    while let Some(notification) = outcomes.next().await {
        if notification.is_loading() {
            if cli.format == OutputFormat::Text && !cli.quiet {
                eprintln!("{}", text.format_loading());
            }
            continue;
        }
        terminal = Some(notification);
        break;
    }

    let Some(terminal) = terminal else {
        anyhow::bail!("Assistant stopped without a result");
    };

    match cli.format {
        OutputFormat::Text => {
            if let Resource::Success(outcome) = &terminal {
                println!("{}", text.format_outcome(outcome));
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&terminal)?);
        }
    }

    match terminal {
        Resource::Error(message) => Err(UpstreamFailure(message).into()),
        Resource::Success(_) | Resource::Loading => Ok(()),
    }
}
