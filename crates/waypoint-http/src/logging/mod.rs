pub mod config;

pub use config::{init_logging, log_route_table, log_startup_info, LoggingConfig};
