//! Startup error types for the Axum adapter.
//!
//! Request handling has no failure path of its own: catalog errors are
//! turned into error frames inside stream sessions. Only configuration can
//! fail, and it fails before the listener is bound.

use thiserror::Error;

/// Invalid server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be used.
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::invalid("PORT", "eighty", "not a port number");
        let msg = err.to_string();
        assert!(msg.contains("PORT"));
        assert!(msg.contains("\"eighty\""));
        assert!(msg.contains("not a port number"));
    }
}
