//! Table configuration models.

/// Upper bound accepted for a table inbox
pub const MAX_INBOX_CAPACITY: usize = 1_024;

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Moves a table can queue before the dispatcher turns new ones away
    pub inbox_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { inbox_capacity: 8 }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inbox_capacity == 0 || self.inbox_capacity > MAX_INBOX_CAPACITY {
            return Err(format!(
                "Table inbox capacity must be between 1 and {}",
                MAX_INBOX_CAPACITY
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_inbox_rejected() {
        let config = TableConfig { inbox_capacity: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_inbox_rejected() {
        let config = TableConfig {
            inbox_capacity: MAX_INBOX_CAPACITY + 1,
        };
        assert!(config.validate().is_err());
    }
}
