//! HTTP routing for waypoint
//!
//! This module provides:
//! - Path templates with regex-constrained parameters
//! - An ordered, first-match route table
//! - Scoped route groups and API version groups
//! - The `Router` registration surface

pub mod extraction;
pub mod group;
pub mod pattern;
pub mod router;
pub mod table;
pub mod versioned;

pub use extraction::{ExtractedParams, ExtractionError};
pub use group::{join_paths, GroupContext};
pub use pattern::{match_path, split_segments, ParamConstraint, PathSegment, RoutePattern, RoutePatternError};
pub use router::Router;
pub use table::{Route, RouteInfo, RouteTable};
pub use versioned::VersionGroup;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// HTTP methods routes can be registered under.
///
/// Requests may carry other method tokens; they are dispatched but never
/// match a route. See `RequestContext::from_parts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    TRACE,
    CONNECT,
}

/// Error returned when a method string is not a supported HTTP method
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported HTTP method: {0}")]
pub struct MethodParseError(pub String);

impl HttpMethod {
    /// Canonical upper-case name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
            HttpMethod::CONNECT => "CONNECT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            "PATCH" => Ok(HttpMethod::PATCH),
            "HEAD" => Ok(HttpMethod::HEAD),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            "TRACE" => Ok(HttpMethod::TRACE),
            "CONNECT" => Ok(HttpMethod::CONNECT),
            _ => Err(MethodParseError(s.to_string())),
        }
    }
}
