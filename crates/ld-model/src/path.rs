//! Dotted path resolution against a model
//!
//! A path such as `adr.streetAddress` addresses nested object keys, one
//! segment per level. A segment applied to an array is read as a zero-based
//! index, so `alumni.0.givenName` reaches into the first element.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::marker;
use crate::{Error, Result};

/// A validated dot-separated model path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelPath {
    /// Path text as written in the mapping
    raw: String,

    /// Segments in traversal order, never empty
    segments: Vec<String>,
}

impl ModelPath {
    /// Parse and validate a path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for an empty path or an empty segment,
    /// and [`Error::ReservedMarker`] when the path starts with a marker.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_path(path, "path is empty"));
        }

        if let Some(marker) = marker::leading(path) {
            return Err(Error::ReservedMarker {
                path: path.to_string(),
                marker,
            });
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(Error::invalid_path(
                path,
                format!("segment {} is empty", index + 1),
            ));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Path text as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path segments in traversal order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment; the default output key of a positional entry
    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.segments.last().map_or(self.raw.as_str(), String::as_str)
    }

    /// Resolve this path against a model.
    ///
    /// An explicit `null` stored under the final key resolves to `null`; only
    /// an absent key or index is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] naming the first segment that has no
    /// value.
    pub fn resolve<'a>(&self, model: &'a Value) -> Result<&'a Value> {
        let mut current = model;
        for segment in &self.segments {
            current = step(current, segment)
                .ok_or_else(|| Error::path_not_found(&self.raw, segment))?;
        }

        trace!(path = %self.raw, "resolved model path");
        Ok(current)
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ModelPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse `path` and resolve it against `model` in one step.
///
/// # Errors
///
/// Returns any parse error of [`ModelPath::parse`] or
/// [`Error::PathNotFound`] when the path does not resolve.
pub fn resolve<'a>(model: &'a Value, path: &str) -> Result<&'a Value> {
    ModelPath::parse(path)?.resolve(model)
}
