//! The request value seen by middleware and handlers
//!
//! Everything dispatch knows about a request lives here. Matching and
//! argument resolution read only from this value, never from process state.

use crate::routing::{ExtractedParams, HttpMethod};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Request method, path, headers and body plus per-dispatch state
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Option<HttpMethod>,
    method_name: String,
    path: String,
    query: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    request_id: Uuid,
    route_params: ExtractedParams,
    attributes: HashMap<String, serde_json::Value>,
}

impl RequestContext {
    /// Create a context for `method` and a URI-like `target`.
    ///
    /// Any query string or fragment is split off the path.
    pub fn new(method: HttpMethod, target: &str) -> Self {
        Self::with_method(Some(method), method.as_str().to_string(), target)
    }

    fn with_method(method: Option<HttpMethod>, method_name: String, target: &str) -> Self {
        let without_fragment = target.split('#').next().unwrap_or(target);
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (without_fragment, None),
        };

        Self {
            method,
            method_name,
            path: path.to_string(),
            query,
            headers: HashMap::new(),
            body: Vec::new(),
            request_id: Uuid::new_v4(),
            route_params: ExtractedParams::new(),
            attributes: HashMap::new(),
        }
    }

    /// Shorthand for a `GET` request
    pub fn get(target: &str) -> Self {
        Self::new(HttpMethod::GET, target)
    }

    /// Create a context from raw method and target strings.
    ///
    /// A method token outside `HttpMethod` (`PURGE`, `MKCOL`, ...) is kept
    /// by name only. Such a request is valid but matches no route.
    pub fn from_parts(method: &str, target: &str) -> Self {
        let method_name = method.trim().to_ascii_uppercase();
        Self::with_method(method_name.parse().ok(), method_name, target)
    }

    /// Add a header (builder style); names are case-insensitive
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the raw body (builder style)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the JSON body and set the content type
    pub fn with_json_body<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = serde_json::to_vec(value)?;
        self.set_header("content-type", "application/json");
        Ok(self)
    }

    /// The routable method, or `None` for an extension method
    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// Upper-case method token as received
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Request path without query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, if the target carried one
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Unique id for log correlation
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Get a header value, ignoring name case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Set a header, replacing any previous value
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// All headers, keyed by lower-case name
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Parameters bound by the matched route; empty before a match
    pub fn route_params(&self) -> &ExtractedParams {
        &self.route_params
    }

    /// Convenience accessor for one route parameter
    pub fn route_param(&self, name: &str) -> Option<&str> {
        self.route_params.get_str(name)
    }

    pub(crate) fn set_route_params(&mut self, params: ExtractedParams) {
        self.route_params = params;
    }

    /// Read a value a middleware attached to the request
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Attach a value for later middleware or the handler
    pub fn set_attribute(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.attributes.insert(key.into(), value);
    }
}
