#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # ld-model
//!
//! Model values and dotted path resolution for schema.org JSON-LD mappings.
//!
//! A model is any read-only structured record. It is held as a
//! [`serde_json::Value`]; any `Serialize` type can be turned into one with
//! [`to_model`], which exposes its fields by their serialized names.

/// Reserved marker characters of the mapping language.
pub mod marker;
/// Parsed dot-separated paths and their resolution against a model.
pub mod path;
/// Helpers for classifying and converting model values.
pub mod value;

/// Path primitives.
pub use path::{ModelPath, resolve};
/// Value helpers.
pub use value::{kind_of, to_model};

use thiserror::Error;

/// Errors that can occur when addressing a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Path '{path}' not found in model: no value at segment '{segment}'")]
    PathNotFound { path: String, segment: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Path '{path}' begins with reserved marker '{marker}'")]
    ReservedMarker { path: String, marker: char },

    #[error("Conversion error in {context}: {message}")]
    Conversion { context: String, message: String },
}

impl Error {
    /// Build a path-not-found error naming the first missing segment.
    pub fn path_not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PathNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a conversion error with conversion context.
    pub fn conversion(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
