//! API version groups
//!
//! A version group is a route group whose prefix defaults to a path derived
//! from an API version, e.g. `/api/v2`.

use crate::config::DispatchConfig;
use crate::middleware::MiddlewareRef;

/// Options for a version group
#[derive(Debug, Clone, Default)]
pub struct VersionGroup {
    prefix: Option<String>,
    version: Option<String>,
    middleware: Vec<MiddlewareRef>,
}

impl VersionGroup {
    /// A version group using the configured API version
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit version instead of the configured one
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Use an explicit prefix; the version is then ignored
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Add middleware for every route in the group
    pub fn middleware(mut self, middleware: MiddlewareRef) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn middleware_list(&self) -> &[MiddlewareRef] {
        &self.middleware
    }

    /// Prefix the group registers under.
    ///
    /// An explicit prefix wins. Otherwise the prefix is
    /// `{api_prefix}/v{version}`; a leading `v` on the version is not doubled.
    pub fn resolve_prefix(&self, config: &DispatchConfig) -> String {
        if let Some(prefix) = &self.prefix {
            return prefix.clone();
        }

        let version = self.version.as_deref().unwrap_or(&config.api_version);
        let version = version
            .strip_prefix('v')
            .or_else(|| version.strip_prefix('V'))
            .unwrap_or(version);

        format!("{}/v{}", config.api_prefix.trim_end_matches('/'), version)
    }
}
