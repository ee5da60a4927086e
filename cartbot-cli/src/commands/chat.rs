//! Chat command - interactive session over stdin.
//!
//! Each line is sent through the assistant. Ctrl-C while a reply is pending
//! drops the invocation. Ctrl-C at the prompt, Ctrl-D or `/quit` ends the
//! session.

use std::io::Write;

use anyhow::Result;
use cartbot_assistant::ChatAssistant;
use cartbot_store::ChatSession;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info};

use crate::commands::{assistant, load_config};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// What a REPL line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Clear,
    History,
    Help,
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Empty,
        "/quit" | "/exit" => Input::Quit,
        "/clear" => Input::Clear,
        "/history" => Input::History,
        "/help" => Input::Help,
        message => Input::Message(message),
    }
}

/// Runs the chat command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let assistant = assistant(&config)?;
    let mut session = ChatSession::new(config.general.history_limit);
    let text = TextFormatter::new(cli.use_colors());

    info!(base_url = %config.backend.base_url, "Starting chat session");

    if cli.format == OutputFormat::Text && !cli.quiet {
        println!("{}", assistant.settings().fallback_greeting);
        println!("Type /help for commands.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(cli)?;

        // The default SIGINT handler is gone once an exchange has listened
        // for Ctrl-C, so the prompt listens too.
        let Some(line) = next_input(&mut lines, tokio::signal::ctrl_c()).await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Clear => {
                session.clear();
                println!("Conversation cleared.");
            }
            Input::History => {
                for turn in session.turns() {
                    println!("{}", text.format_turn(turn));
                }
            }
            Input::Help => print_help(),
            Input::Message(message) => {
                session.record_user(message);
                exchange(&assistant, message, &mut session, cli).await?;
            }
        }
    }

    Ok(())
}

/// Reads the next line, or `None` on end of input or when `interrupt` fires first.
async fn next_input<R, F>(lines: &mut Lines<R>, interrupt: F) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future,
{
    tokio::select! {
        line = lines.next_line() => {
            let line = line?;
            if line.is_none() {
                debug!("Stdin closed");
            }
            Ok(line)
        }
        _ = interrupt => {
            debug!("Interrupted at prompt");
            println!();
            Ok(None)
        }
    }
}

/// Sends one message and prints the result, cancelling on Ctrl-C.
async fn exchange(
    assistant: &ChatAssistant,
    message: &str,
    session: &mut ChatSession,
    cli: &Cli,
) -> Result<()> {
    let text = TextFormatter::new(cli.use_colors());
    let outcomes = assistant.process_message(message);

    if cli.format == OutputFormat::Text && !cli.quiet {
        eprintln!("{}", text.format_loading());
    }

    let terminal = tokio::select! {
        terminal = outcomes.terminal() => terminal,
        _ = tokio::signal::ctrl_c() => {
            debug!("Invocation cancelled by user");
            eprintln!("Cancelled.");
            return Ok(());
        }
    };

    match terminal {
        Some(Ok(outcome)) => {
            match cli.format {
                OutputFormat::Text => println!("{}", text.format_outcome(&outcome)),
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format(&outcome)?);
                }
            }
            session.record_outcome(&outcome);
        }
        Some(Err(error)) => {
            eprintln!("{}", text.format_error(&error));
            session.record_error(error);
        }
        None => eprintln!("{}", text.format_error("No reply")),
    }

    Ok(())
}

fn prompt(cli: &Cli) -> Result<()> {
    if cli.format == OutputFormat::Text {
        print!("> ");
        std::io::stdout().flush()?;
    }
    Ok(())
}

fn print_help() {
    println!("/history  show the conversation so far");
    println!("/clear    forget the conversation");
    println!("/quit     leave");
    println!("Ctrl-C cancels a pending reply, or leaves at the prompt.");
}
