//! Errors raised while loading or checking configuration

use thiserror::Error;

/// Why a configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A single field holds a value it cannot accept
    #[error("{field} = '{value}' is invalid, expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// The loaded values are individually fine but inconsistent
    #[error("Invalid configuration: {message}")]
    ValidationFailed { message: String },

    #[error("Malformed YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}
