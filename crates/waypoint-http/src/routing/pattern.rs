//! Route pattern parsing and matching
//!
//! A route template is split into `/`-separated segments. Each segment is
//! either a literal, compared byte for byte, or a parameter written as
//! `{name:pattern}` whose pattern must match the whole request segment.
//! `{name}` is shorthand for a parameter accepting any non-empty segment.

use super::extraction::ExtractedParams;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// Pattern used for `{name}` parameters without an explicit constraint
const UNCONSTRAINED_PATTERN: &str = "[^/]+";

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("parameter name regex is valid"));

/// Errors that can occur while compiling a route template
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutePatternError {
    #[error("Invalid pattern syntax in '{template}': {reason}")]
    InvalidSyntax { template: String, reason: String },
    #[error("Invalid constraint for parameter '{param}': {reason}")]
    InvalidConstraint { param: String, reason: String },
    #[error("Duplicate parameter name: {0}")]
    DuplicateParameter(String),
}

/// Anchored regular expression a parameter value must satisfy.
///
/// Constraints use the `regex` crate's Unicode-aware classes, so `\d`, `\w`
/// and `\s` accept non-ASCII digits, letters and spaces. Write `[0-9]+` or
/// `(?-u:\d)+` when only ASCII should bind, e.g. ids later parsed as `u64`.
#[derive(Debug, Clone)]
pub struct ParamConstraint {
    source: String,
    regex: Regex,
}

impl ParamConstraint {
    /// Compile `pattern` so that it only accepts a full segment
    pub fn new(param: &str, pattern: &str) -> Result<Self, RoutePatternError> {
        if pattern.is_empty() {
            return Err(RoutePatternError::InvalidConstraint {
                param: param.to_string(),
                reason: "constraint pattern is empty".to_string(),
            });
        }

        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            RoutePatternError::InvalidConstraint {
                param: param.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written in the template
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check a raw request segment against the constraint
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for ParamConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A single path segment in a route pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Literal text segment
    Literal(String),
    /// Parameter segment with its constraint
    Parameter {
        name: String,
        constraint: ParamConstraint,
    },
}

/// Parsed route template
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// The template as registered
    pub original_path: String,
    /// Parsed path segments
    pub segments: Vec<PathSegment>,
    /// Parameter names in order of appearance
    pub param_names: Vec<String>,
}

/// Split a path into segments after trimming surrounding separators.
///
/// An empty or root path yields a single empty segment, on the template side
/// and on the request side alike.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').collect()
}

impl RoutePattern {
    /// Parse a route template
    pub fn parse(path: &str) -> Result<Self, RoutePatternError> {
        let mut segments = Vec::new();
        let mut param_names = Vec::new();
        let mut seen_params = HashSet::new();

        for segment in split_segments(path) {
            match Self::parse_parameter_definition(path, segment)? {
                Some((name, constraint)) => {
                    if !seen_params.insert(name.clone()) {
                        return Err(RoutePatternError::DuplicateParameter(name));
                    }
                    param_names.push(name.clone());
                    segments.push(PathSegment::Parameter { name, constraint });
                }
                None => segments.push(PathSegment::Literal(segment.to_string())),
            }
        }

        Ok(RoutePattern {
            original_path: path.to_string(),
            segments,
            param_names,
        })
    }

    /// Parse `{name}` or `{name:pattern}`; `None` for a literal segment
    fn parse_parameter_definition(
        template: &str,
        segment: &str,
    ) -> Result<Option<(String, ParamConstraint)>, RoutePatternError> {
        let inner = match segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(inner) => inner,
            None => return Ok(None),
        };

        let (name, pattern) = match inner.split_once(':') {
            Some((name, pattern)) => (name, pattern),
            None => (inner, UNCONSTRAINED_PATTERN),
        };

        if !PARAM_NAME.is_match(name) {
            return Err(RoutePatternError::InvalidSyntax {
                template: template.to_string(),
                reason: format!("'{}' is not a valid parameter name", name),
            });
        }

        let constraint = ParamConstraint::new(name, pattern)?;
        Ok(Some((name.to_string(), constraint)))
    }

    /// Match a request path, returning the bound parameters on success.
    ///
    /// Parameter values are checked in their raw form and bound
    /// percent-decoded. A failed attempt returns `None` and discards any
    /// values bound before the failing segment.
    pub fn match_path(&self, path: &str) -> Option<ExtractedParams> {
        let path_segments = split_segments(path);
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = ExtractedParams::new();
        for (segment, value) in self.segments.iter().zip(path_segments) {
            match segment {
                PathSegment::Literal(expected) => {
                    if expected.as_str() != value {
                        return None;
                    }
                }
                PathSegment::Parameter { name, constraint } => {
                    if !constraint.is_match(value) {
                        return None;
                    }
                    params.insert(name.clone(), decode_segment(value));
                }
            }
        }

        Some(params)
    }

    /// Check if this pattern matches a given path
    pub fn matches(&self, path: &str) -> bool {
        self.match_path(path).is_some()
    }

    /// Number of segments a request path must have to match
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is a literal-only route
    pub fn is_static(&self) -> bool {
        self.param_names.is_empty()
    }
}

/// Parse `template` and match `request_path` against it in one step
pub fn match_path(
    request_path: &str,
    template: &str,
) -> Result<Option<ExtractedParams>, RoutePatternError> {
    Ok(RoutePattern::parse(template)?.match_path(request_path))
}

fn decode_segment(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}
