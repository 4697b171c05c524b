//! Provenance of loaded configuration values

use std::fmt;

/// Where a configuration value was taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the named environment variable
    EnvVar(String),
    /// The variable was unset; holds the default as rendered text
    Default(String),
}

impl ConfigSource {
    pub fn is_env_var(&self) -> bool {
        matches!(self, Self::EnvVar(_))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(key) => write!(f, "${}", key),
            Self::Default(value) => write!(f, "default ({})", value),
        }
    }
}
