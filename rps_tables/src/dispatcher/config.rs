//! Dispatcher configuration.

use crate::table::TableConfig;
use std::{fmt, str::FromStr};

/// What the dispatcher does when a reply cannot be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Stop the dispatcher and surface the error
    #[default]
    Abort,

    /// Log the failure and keep going
    LogAndContinue,
}

impl fmt::Display for DeliveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryPolicy::Abort => write!(f, "abort"),
            DeliveryPolicy::LogAndContinue => write!(f, "continue"),
        }
    }
}

impl FromStr for DeliveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(DeliveryPolicy::Abort),
            "continue" => Ok(DeliveryPolicy::LogAndContinue),
            other => Err(format!("Unknown delivery policy: {other}")),
        }
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Inbound messages buffered ahead of the dispatcher
    pub inbound_capacity: usize,

    /// Reaction to failed deliveries
    pub delivery_policy: DeliveryPolicy,

    /// Settings applied to every table
    pub table: TableConfig,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            inbound_capacity: 256,
            delivery_policy: DeliveryPolicy::Abort,
            table: TableConfig::default(),
        }
    }
}

impl DispatcherConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inbound_capacity == 0 {
            return Err("Inbound capacity must be greater than 0".to_string());
        }

        self.table.validate()
    }
}
