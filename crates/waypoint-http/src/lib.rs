//! # waypoint-http
//!
//! Route matching and request dispatch core for the waypoint framework.
//!
//! This crate provides:
//! - Path templates with regex-constrained parameters
//! - An ordered, first-match route table with nested groups and API versions
//! - Short-circuiting middleware chains built fresh per request
//! - Handler argument resolution from route values, providers and defaults
//! - A `Send + Sync` dispatcher with a 404 fallback
//!
//! ```ignore
//! use waypoint_http::{HandlerRef, ParamSpec, Router};
//!
//! let mut router = Router::new();
//! router.get(
//!     "/users/{id:\\d+}",
//!     HandlerRef::callable(vec![ParamSpec::text("id")], |args, _req, resp| {
//!         resp.set_text(format!("user {}", args.text("id").unwrap_or_default()));
//!     }),
//! )?;
//!
//! let dispatcher = router.build();
//! let (outcome, response) = dispatcher.dispatch("GET", "/users/7")?;
//! ```

// Core modules
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod handler;
pub mod logging;
pub mod middleware;
pub mod request;
pub mod response;
pub mod routing;

pub use config::{DispatchConfig, DispatchDefaults};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use errors::{DispatchError, DispatchResult};

// Re-export routing types
pub use routing::{
    join_paths, match_path, ExtractedParams, ExtractionError, GroupContext, HttpMethod,
    MethodParseError, ParamConstraint, PathSegment, Route, RouteInfo, RoutePattern,
    RoutePatternError, RouteTable, Router, VersionGroup,
};

// Re-export handler and middleware types
pub use handler::{
    ActionRegistry, Argument, ArgumentResolver, Arguments, HandlerRef, MethodRef, ParamKind,
    ParamSpec, ResolvedHandler,
};
pub use middleware::{ChainOutcome, Middleware, MiddlewareChain, MiddlewareRef, MiddlewareRegistry};

// Re-export request/response types
pub use request::RequestContext;
pub use response::{Response, ResponseBody};

pub use logging::{init_logging, LoggingConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
