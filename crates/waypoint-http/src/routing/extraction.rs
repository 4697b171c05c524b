//! Extracted route parameters
//!
//! Values are stored exactly as matched (after percent-decoding). Typed
//! accessors are offered for handlers that want conversion; dispatch itself
//! never converts.

use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when reading a parameter as a typed value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Missing parameter: {0}")]
    Missing(String),
    #[error("Type conversion failed for parameter '{param}': {error}")]
    ConversionFailed { param: String, error: String },
}

/// Parameters bound by a single successful match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedParams {
    values: HashMap<String, String>,
}

impl ExtractedParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.values.insert(name, value);
    }

    /// Get a parameter as a raw string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Check whether a parameter was bound
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Get a parameter converted to a specific type
    pub fn get<T>(&self, name: &str) -> Result<T, ExtractionError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ExtractionError::Missing(name.to_string()))?;

        value
            .parse::<T>()
            .map_err(|e| ExtractionError::ConversionFailed {
                param: name.to_string(),
                error: e.to_string(),
            })
    }

    /// Get a parameter with a default value if missing
    pub fn get_or<T>(&self, name: &str, default: T) -> Result<T, ExtractionError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(name) {
            Ok(value) => Ok(value),
            Err(ExtractionError::Missing(_)) => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Get a parameter as an Option (None if missing)
    pub fn get_optional<T>(&self, name: &str) -> Result<Option<T>, ExtractionError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(name) {
            Ok(value) => Ok(Some(value)),
            Err(ExtractionError::Missing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Iterate over name/value pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }
}

impl From<HashMap<String, String>> for ExtractedParams {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for ExtractedParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
