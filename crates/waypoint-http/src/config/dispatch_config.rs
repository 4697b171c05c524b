//! Dispatch configuration
//!
//! Values the router consults while registering and dispatching: the
//! ambient API version used by version groups, the fallback 404 body and the
//! redirect status.

use super::defaults::DispatchDefaults;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use waypoint_core::config::{env_source, get_env_or_default, parse_env_or_default};
use waypoint_core::{AppConfigTrait, ConfigError, ConfigSource};

const ENV_API_VERSION: &str = "WAYPOINT_API_VERSION";
const ENV_API_PREFIX: &str = "WAYPOINT_API_PREFIX";
const ENV_NOT_FOUND_BODY: &str = "WAYPOINT_NOT_FOUND_BODY";
const ENV_REDIRECT_STATUS: &str = "WAYPOINT_REDIRECT_STATUS";

/// Router and dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Version used by version groups that do not name one
    pub api_version: String,
    /// Path under which version prefixes are derived
    pub api_prefix: String,
    /// Body written when no route matches and no 404 handler is set
    pub not_found_body: String,
    /// Status used by `Router::redirect`
    pub redirect_status: u16,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            api_version: DispatchDefaults::API_VERSION.to_string(),
            api_prefix: DispatchDefaults::API_PREFIX.to_string(),
            not_found_body: DispatchDefaults::NOT_FOUND_BODY.to_string(),
            redirect_status: DispatchDefaults::REDIRECT_STATUS,
        }
    }
}

impl AppConfigTrait for DispatchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = DispatchConfig {
            api_version: get_env_or_default(ENV_API_VERSION, DispatchDefaults::API_VERSION),
            api_prefix: get_env_or_default(ENV_API_PREFIX, DispatchDefaults::API_PREFIX),
            not_found_body: get_env_or_default(ENV_NOT_FOUND_BODY, DispatchDefaults::NOT_FOUND_BODY),
            redirect_status: parse_env_or_default(
                ENV_REDIRECT_STATUS,
                "redirect_status",
                DispatchDefaults::REDIRECT_STATUS,
                "an HTTP status code between 300 and 399",
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::validation_failed("API version must not be empty"));
        }

        if self.api_version.contains('/') {
            return Err(ConfigError::invalid_value(
                "api_version",
                &self.api_version,
                "a single path segment",
            ));
        }

        if !self.api_prefix.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "api_prefix",
                &self.api_prefix,
                "a path starting with '/'",
            ));
        }

        if !(300..=399).contains(&self.redirect_status) {
            return Err(ConfigError::invalid_value(
                "redirect_status",
                self.redirect_status.to_string(),
                "an HTTP status code between 300 and 399",
            ));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "api_version".to_string(),
            env_source(ENV_API_VERSION, DispatchDefaults::API_VERSION),
        );
        sources.insert(
            "api_prefix".to_string(),
            env_source(ENV_API_PREFIX, DispatchDefaults::API_PREFIX),
        );
        sources.insert(
            "not_found_body".to_string(),
            env_source(ENV_NOT_FOUND_BODY, DispatchDefaults::NOT_FOUND_BODY),
        );
        sources.insert(
            "redirect_status".to_string(),
            env_source(ENV_REDIRECT_STATUS, DispatchDefaults::REDIRECT_STATUS),
        );
        sources
    }
}

impl DispatchConfig {
    /// Load from a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}
