//! Rock-paper-scissors table server.
//!
//! Wires a transport (console or Telegram) to the table dispatcher and runs
//! until the input source ends or Ctrl+C arrives.

mod config;
mod console;
mod telegram;

use std::sync::Arc;

use anyhow::{Context, Error};
use config::{ServerConfig, TransportKind};
use log::{error, info, warn};
use pico_args::Arguments;
use rps_tables::{Dispatcher, inbound_channel};

const HELP: &str = "\
Run a multi-table rock-paper-scissors server

USAGE:
  rps_server [OPTIONS]

OPTIONS:
  --transport  KIND        console or telegram  [default: env RPS_TRANSPORT or console]

FLAGS:
  -h, --help               Print help information

COMMANDS (sent by players):
  /join                    Open a table
  /rock /paper /scissors   Play a round
  /exit                    Leave the table

ENVIRONMENT:
  RPS_TRANSPORT            Transport to use (console, telegram)
  TELEGRAM_BOT_TOKEN       Bot token, required for telegram
  TELEGRAM_API_URL         Bot API root [default: https://api.telegram.org]
  TELEGRAM_POLL_TIMEOUT_SECS  Long-poll timeout [default: 30]
  TELEGRAM_RETRY_DELAY_MS  Pause after a failed poll [default: 1000]
  CONSOLE_SENDER_ID        Sender for console lines without one [default: 1]
  INBOUND_CAPACITY         Inbound queue length [default: 256]
  TABLE_INBOX_CAPACITY     Moves a table can queue [default: 8]
  DELIVERY_POLICY          abort or continue on failed replies [default: abort]
  (See .env.example for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let transport: Option<TransportKind> = pargs.opt_value_from_str("--transport")?;
    let leftover = pargs.finish();

    env_logger::builder().format_target(false).init();

    if !leftover.is_empty() {
        warn!("Ignoring unrecognized arguments: {:?}", leftover);
    }

    let config = ServerConfig::from_env(transport)?;
    config.validate()?;
    info!("Starting rps server with {} transport", config.transport);

    let (inbound_tx, inbound_rx) = inbound_channel(config.dispatcher.inbound_capacity);

    let result = match config.transport {
        TransportKind::Console => {
            console::spawn_stdin_reader(inbound_tx, config.console_sender)
                .context("Failed to start console reader")?;
            info!(
                "Reading commands from stdin as '<sender> <command>'. Press Ctrl+C to stop."
            );

            Dispatcher::new(config.dispatcher, inbound_rx, Arc::new(console::ConsoleSink))
                .run_until(shutdown_signal())
                .await
        }
        TransportKind::Telegram => {
            let telegram = config
                .telegram
                .context("Telegram transport selected without Telegram settings")?;
            let client = telegram::TelegramClient::new(&telegram)
                .context("Failed to build Telegram client")?;

            let poller = telegram::Poller::new(client.clone(), &telegram);
            let polling = tokio::spawn(poller.run(inbound_tx));

            let result = Dispatcher::new(config.dispatcher, inbound_rx, Arc::new(client))
                .run_until(shutdown_signal())
                .await;
            polling.abort();
            result
        }
    };

    if let Err(e) = &result {
        error!("Dispatcher failed: {e}");
    }
    info!("Shutting down server...");

    result.map_err(Error::from)
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
        // Without a handler, only the input source can end the server
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C");
}
