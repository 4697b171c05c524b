//! Dispatch configuration

pub mod defaults;
pub mod dispatch_config;

pub use defaults::DispatchDefaults;
pub use dispatch_config::DispatchConfig;
