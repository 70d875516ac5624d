//! # ld-mapping
//!
//! Mapping DSL, validation and interpreter producing schema.org JSON-LD.
//!
//! A mapping is a compact, JSON-like tree that says how a model becomes a
//! JSON-LD document. Keys starting with an uppercase letter open a typed
//! object, values starting with `:` are literals, values starting with `@`
//! are enumeration members, keys starting with `[` expand a model sequence,
//! and every other string is a dotted path into the model.
//!
//! ```yaml
//! Product:
//!   - name
//!   - offers:
//!       Offer:
//!         availability: "@InStock"
//!         price: price
//!         priceCurrency: ":EUR"
//! ```

pub mod dsl;
pub mod interpreter;
pub mod mapping;
pub mod options;

pub use dsl::{MappingDsl, ParseError};
pub use interpreter::{Interpreter, generate};
pub use mapping::{
    ArraySource, CONTEXT_KEY, Computed, Mapping, MappingNode, Property, PropertyValue, Scalar,
};
pub use options::{InterpretOptions, MissingPathPolicy, SCHEMA_ORG};

/// Reserved marker characters, re-exported for mapping authors
pub use ld_model::marker;

use thiserror::Error;

/// Errors that can occur while building or interpreting a mapping
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid mapping value for '{key}': unsupported {kind}")]
    InvalidMappingValue { key: String, kind: String },

    #[error("Path '{path}' not found in model: no value at segment '{segment}'")]
    PathNotFound { path: String, segment: String },

    #[error("Invalid array expansion '{key}': {reason}")]
    ArrayExpansionTypeMismatch { key: String, reason: String },

    #[error("Array source '{path}' resolved to {kind}, expected an array")]
    NotASequence { path: String, kind: String },

    #[error("Array expansion without a source path has no enclosing key to use as its path")]
    MissingArraySource,

    #[error("Invalid type name '{0}': must start with an uppercase letter and contain only letters and digits")]
    InvalidTypeName(String),

    #[error("Type '{type_name}' must contain properties, found {found}")]
    InvalidTypeBody { type_name: String, found: String },

    #[error("Invalid output key '{key}': {reason}")]
    InvalidOutputKey { key: String, reason: String },

    #[error("Positional entry {index} must be a model path, found {found}")]
    PositionalEntry { index: usize, found: String },

    #[error(transparent)]
    Path(ld_model::Error),

    #[error("DSL parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Build an invalid-mapping-value error for `key` holding a value of `kind`.
    pub fn invalid_value(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::InvalidMappingValue {
            key: key.into(),
            kind: kind.into(),
        }
    }

    /// Build an array-expansion error for the marker key `key`.
    pub fn array_mismatch(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArrayExpansionTypeMismatch {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<ld_model::Error> for Error {
    fn from(err: ld_model::Error) -> Self {
        match err {
            ld_model::Error::PathNotFound { path, segment } => Self::PathNotFound { path, segment },
            other => Self::Path(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
