//! Console transport for local play.
//!
//! Each stdin line is `<sender> <text>`, or just `<text>` for the default
//! sender. Replies are printed as `[<recipient>] <text>`.

use async_trait::async_trait;
use log::{debug, info, warn};
use rps_tables::{InboundMessage, OutboundSink, SessionId, TransportError};
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

/// Parse one console line. Blank lines carry no command.
pub fn parse_line(line: &str, default_sender: SessionId) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some((head, rest)) = line.split_once(char::is_whitespace)
        && let Ok(sender) = head.parse::<SessionId>()
    {
        return Some(InboundMessage::new(sender, rest.trim_start()));
    }

    Some(InboundMessage::new(default_sender, line))
}

/// Render a reply the way the console prints it
pub fn format_reply(recipient: SessionId, text: &str) -> String {
    format!("[{recipient}] {text}")
}

/// Prints replies to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

#[async_trait]
impl OutboundSink for ConsoleSink {
    async fn deliver(&self, recipient: SessionId, text: &str) -> Result<(), TransportError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", format_reply(recipient, text))
            .and_then(|()| stdout.flush())
            .map_err(|e| TransportError::Delivery {
                recipient,
                reason: e.to_string(),
            })
    }
}

/// Read stdin on a dedicated thread and feed the dispatcher.
///
/// The thread ends at EOF or once the dispatcher stops listening. Dropping
/// the sender at EOF is what lets the dispatcher shut down.
pub fn spawn_stdin_reader(
    inbound: mpsc::Sender<InboundMessage>,
    default_sender: SessionId,
) -> io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to read stdin: {e}");
                        break;
                    }
                };

                let Some(message) = parse_line(&line, default_sender) else {
                    continue;
                };

                debug!("Console input from {}: {}", message.sender, message.text);
                if inbound.blocking_send(message).is_err() {
                    return;
                }
            }

            info!("Console input closed");
        })
}
