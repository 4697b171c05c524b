//! Dispatch error types
//!
//! Configuration-shape failures discovered while registering or dispatching
//! routes. A request that matches no route is not an error; it is reported
//! as [`crate::dispatcher::DispatchOutcome::NotFound`].

use crate::routing::RoutePatternError;
use thiserror::Error;
use waypoint_core::{ConfigError, CoreError};

/// Result type for registration and dispatch
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Registration and dispatch errors
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid handler '{handler}': {reason}")]
    InvalidHandler { handler: String, reason: String },

    #[error("Middleware '{middleware}' could not be constructed: {reason}")]
    MiddlewareConstruction { middleware: String, reason: String },

    #[error("Argument '{param}' could not be constructed: {source}")]
    ArgumentConstruction {
        param: String,
        #[source]
        source: CoreError,
    },

    #[error("Invalid route pattern: {0}")]
    Pattern(#[from] RoutePatternError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DispatchError {
    /// Create an invalid handler error
    pub fn invalid_handler<H: Into<String>, R: Into<String>>(handler: H, reason: R) -> Self {
        DispatchError::InvalidHandler {
            handler: handler.into(),
            reason: reason.into(),
        }
    }

    /// Create a middleware construction error
    pub fn middleware_construction<M: Into<String>, R: Into<String>>(
        middleware: M,
        reason: R,
    ) -> Self {
        DispatchError::MiddlewareConstruction {
            middleware: middleware.into(),
            reason: reason.into(),
        }
    }

    /// Create an argument construction error
    pub fn argument_construction<P: Into<String>>(param: P, source: CoreError) -> Self {
        DispatchError::ArgumentConstruction {
            param: param.into(),
            source,
        }
    }

    /// Stable error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::InvalidHandler { .. } => "INVALID_HANDLER",
            DispatchError::MiddlewareConstruction { .. } => "MIDDLEWARE_CONSTRUCTION_FAILED",
            DispatchError::ArgumentConstruction { .. } => "ARGUMENT_CONSTRUCTION_FAILED",
            DispatchError::Pattern(_) => "INVALID_ROUTE_PATTERN",
            DispatchError::Config(_) => "CONFIGURATION_ERROR",
        }
    }
}
