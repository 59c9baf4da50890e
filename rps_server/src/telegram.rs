//! Telegram Bot API transport.
//!
//! Inbound commands are fetched with `getUpdates` long polling and pushed
//! into the dispatcher's inbound channel. Replies go out via `sendMessage`.

use crate::config::TelegramConfig;
use async_trait::async_trait;
use log::{debug, info, warn};
use rps_tables::{InboundMessage, OutboundSink, SessionId, TransportError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tokio::sync::mpsc;

/// Envelope wrapping every Bot API answer
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TransportError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Api(
                self.description
                    .unwrap_or_else(|| "request rejected without description".to_string()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: SessionId,
    text: &'a str,
}

/// Turn an update into an inbound command, if it carries a message.
///
/// The chat ID is the correspondent. Non-text messages become empty
/// commands so the sender still gets an answer.
pub fn into_inbound(update: Update) -> Option<InboundMessage> {
    let message = update.message?;
    Some(InboundMessage::new(
        message.chat.id,
        message.text.unwrap_or_default(),
    ))
}

/// Decode a Bot API answer. The status is checked before the body, so a
/// non-JSON error page still reports the status.
fn parse_response<T>(method: &str, status: StatusCode, body: &str) -> Result<T, TransportError>
where
    T: DeserializeOwned,
{
    if !status.is_success() {
        let description = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.description)
            .unwrap_or_default();
        return Err(TransportError::Api(format!(
            "{} returned {}: {}",
            method, status, description
        )));
    }

    let envelope: ApiResponse<T> =
        serde_json::from_str(body).map_err(|e| TransportError::Http(e.to_string()))?;
    envelope.into_result()
}

/// Thin Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    /// Create a client for the bot identified by `config.token`.
    ///
    /// The HTTP timeout leaves room above the long-poll timeout so a quiet
    /// poll is not mistaken for a dead connection.
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.token
            ),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        parse_response(method, status, &body)
    }

    /// Fetch updates with IDs at or above `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: ["message"],
        };
        self.call("getUpdates", &request).await
    }

    /// Send a plain text message to a chat.
    pub async fn send_message(&self, chat_id: SessionId, text: &str) -> Result<(), TransportError> {
        let request = SendMessage { chat_id, text };
        // The sent message object is not needed
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }
}

#[async_trait]
impl OutboundSink for TelegramClient {
    async fn deliver(&self, recipient: SessionId, text: &str) -> Result<(), TransportError> {
        self.send_message(recipient, text)
            .await
            .map_err(|e| TransportError::Delivery {
                recipient,
                reason: e.to_string(),
            })
    }
}

/// Long-polling loop feeding the dispatcher
pub struct Poller {
    client: TelegramClient,
    offset: i64,
    poll_timeout_secs: u64,
    retry_delay: Duration,
}

impl Poller {
    pub fn new(client: TelegramClient, config: &TelegramConfig) -> Self {
        Self {
            client,
            offset: 0,
            poll_timeout_secs: config.poll_timeout_secs,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Acknowledge `update` so the next poll skips it.
    fn advance(&mut self, update: &Update) {
        self.offset = self.offset.max(update.update_id + 1);
    }

    /// Poll until the dispatcher's inbound channel closes.
    pub async fn run(mut self, inbound: mpsc::Sender<InboundMessage>) {
        info!("Polling Telegram for updates");

        loop {
            let updates = tokio::select! {
                result = self.client.get_updates(self.offset, self.poll_timeout_secs) => result,
                () = inbound.closed() => break,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("Polling failed: {e}, retrying in {:?}", self.retry_delay);
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
            };

            for update in updates {
                self.advance(&update);
                let Some(message) = into_inbound(update) else {
                    debug!("Skipping update without a message");
                    continue;
                };

                if inbound.send(message).await.is_err() {
                    info!("Dispatcher stopped, polling ends");
                    return;
                }
            }
        }

        info!("Dispatcher stopped, polling ends");
    }
}
