//! Terminal host for the todo sync controller.
//!
//! Reads commands from stdin, feeds them to the controller as events, and
//! prints every view and alert the controller publishes. Network presence is
//! simulated with the `offline`/`online` commands.

mod cli;
mod commands;
mod error;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use todo_sync::{Controller, Event, RemoteClient, UiUpdate, UreqTransport};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::{parse_command, Command, HELP};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_sync=info,todo_cli=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.sync_config()?;
    tracing::info!(base_url = %config.base_url, "starting");

    let remote = RemoteClient::from_config(&config, UreqTransport::new());
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let printer = tokio::spawn(print_updates(ui_rx));
    let reader = tokio::spawn(read_commands(event_tx));

    let mut controller = Controller::new(remote, config, ui_tx).with_online(!cli.offline);
    controller.start().await;
    controller.run(event_rx).await;
    drop(controller);

    printer.await?;
    reader.await??;
    Ok(())
}

async fn read_commands(events: mpsc::UnboundedSender<Event>) -> Result<(), CliError> {
    println!("{HELP}\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Events(batch))) => {
                for event in batch {
                    if events.send(event).is_err() {
                        return Ok(());
                    }
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

async fn print_updates(mut updates: mpsc::UnboundedReceiver<UiUpdate>) {
    let mut last = None;
    while let Some(update) = updates.recv().await {
        match update {
            // Snapshots repeat when a step changes nothing visible.
            UiUpdate::Render(view) if last.as_ref() == Some(&view) => {}
            UiUpdate::Render(view) => {
                println!("{view}\n");
                last = Some(view);
            }
            UiUpdate::Alert(message) => println!("ALERT: {message}\n"),
        }
    }
}
