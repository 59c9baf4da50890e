//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use rps_tables::{DeliveryPolicy, DispatcherConfig, SessionId, TableConfig};
use std::{fmt, str::FromStr};

/// Where commands come from and replies go to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Console,
    Telegram,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Console => write!(f, "console"),
            TransportKind::Telegram => write!(f, "telegram"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(TransportKind::Console),
            "telegram" => Ok(TransportKind::Telegram),
            other => Err(format!("Unknown transport: {other}")),
        }
    }
}

/// Telegram Bot API settings
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token (required)
    pub token: String,
    /// API root, without the `/bot<token>` suffix
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout_secs: u64,
    /// Pause after a failed poll
    pub retry_delay_ms: u64,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Selected transport
    pub transport: TransportKind,
    /// Telegram settings, present when the transport is Telegram
    pub telegram: Option<TelegramConfig>,
    /// Sender ID for console lines that do not name one
    pub console_sender: SessionId,
    /// Dispatcher and table settings
    pub dispatcher: DispatcherConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `transport_override` - Optional transport override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(transport_override: Option<TransportKind>) -> Result<Self, ConfigError> {
        let transport = match transport_override {
            Some(kind) => kind,
            None => parse_env_strict("RPS_TRANSPORT", TransportKind::Console)?,
        };

        let telegram = match transport {
            TransportKind::Telegram => {
                let token =
                    std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| ConfigError::MissingRequired {
                        var: "TELEGRAM_BOT_TOKEN".to_string(),
                        hint: "Create a bot with @BotFather and copy its token".to_string(),
                    })?;

                Some(TelegramConfig {
                    token,
                    api_url: std::env::var("TELEGRAM_API_URL")
                        .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
                    poll_timeout_secs: parse_env_or("TELEGRAM_POLL_TIMEOUT_SECS", 30),
                    retry_delay_ms: parse_env_or("TELEGRAM_RETRY_DELAY_MS", 1_000),
                })
            }
            TransportKind::Console => None,
        };

        let dispatcher = DispatcherConfig {
            inbound_capacity: parse_env_or("INBOUND_CAPACITY", 256),
            delivery_policy: parse_env_strict("DELIVERY_POLICY", DeliveryPolicy::Abort)?,
            table: TableConfig {
                inbox_capacity: parse_env_or("TABLE_INBOX_CAPACITY", 8),
            },
        };

        Ok(ServerConfig {
            transport,
            telegram,
            console_sender: parse_env_or("CONSOLE_SENDER_ID", 1),
            dispatcher,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(reason) = self.dispatcher.table.validate() {
            return Err(ConfigError::Invalid {
                var: "TABLE_INBOX_CAPACITY".to_string(),
                reason,
            });
        }

        if let Err(reason) = self.dispatcher.validate() {
            return Err(ConfigError::Invalid {
                var: "INBOUND_CAPACITY".to_string(),
                reason,
            });
        }

        if let Some(telegram) = &self.telegram {
            if telegram.token.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    var: "TELEGRAM_BOT_TOKEN".to_string(),
                    reason: "Must not be empty".to_string(),
                });
            }

            if !telegram.api_url.starts_with("http://") && !telegram.api_url.starts_with("https://")
            {
                return Err(ConfigError::Invalid {
                    var: "TELEGRAM_API_URL".to_string(),
                    reason: "Must be an http(s) URL".to_string(),
                });
            }

            if telegram.poll_timeout_secs > 50 {
                return Err(ConfigError::Invalid {
                    var: "TELEGRAM_POLL_TIMEOUT_SECS".to_string(),
                    reason: "Must be at most 50 seconds".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like [`parse_env_or`], but a set and unparsable value is an error
fn parse_env_strict<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|reason| ConfigError::Invalid {
            var: key.to_string(),
            reason,
        }),
        Err(_) => Ok(default),
    }
}
