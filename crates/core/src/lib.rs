//! # waypoint-core
//!
//! Shared building blocks for the waypoint dispatch layer: configuration
//! loading and validation, and the provider registry used to construct
//! handler dependencies.

pub mod config;
pub mod container;
pub mod errors;

pub use config::{AppConfigTrait, ConfigError, ConfigSource};
pub use container::{ProviderRegistry, ServiceId};
pub use errors::CoreError;
