//! Response abstraction for recording what a dispatch produced
//!
//! Status, headers and body are collected here; sending them is the
//! caller's job.

use serde::Serialize;
use std::collections::BTreeMap;

/// Response body types
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

/// Response with status, headers and body, built fluently or mutated in place
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    body: ResponseBody,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Create new response with OK status
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// Set response status code (consuming)
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set response status code (borrowing - for middleware use)
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get header value by name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Set a header, replacing any previous value
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Add header (consuming)
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a plain text body
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_header("content-type", "text/plain; charset=utf-8");
        self.body = ResponseBody::Text(text.into());
    }

    /// Set text body (consuming)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Serialize `data` as the JSON body
    pub fn set_json<T: Serialize>(&mut self, data: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(data)?;
        self.set_header("content-type", "application/json");
        self.body = ResponseBody::Json(value);
        Ok(())
    }

    /// Set JSON body (consuming)
    pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self, serde_json::Error> {
        self.set_json(data)?;
        Ok(self)
    }

    /// Turn this response into a redirect to `target`
    pub fn redirect(&mut self, target: &str, status: u16) {
        self.status = status;
        self.set_header("location", target);
        self.body = ResponseBody::Empty;
    }

    /// Turn this response into a 404 with a text body
    pub fn not_found(&mut self, body: impl Into<String>) {
        self.status = 404;
        self.set_text(body);
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Body rendered as a string; JSON is serialized compactly
    pub fn body_string(&self) -> String {
        match &self.body {
            ResponseBody::Empty => String::new(),
            ResponseBody::Text(text) => text.clone(),
            ResponseBody::Json(value) => value.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
