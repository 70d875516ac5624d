#![deny(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # ld-render
//!
//! Script-tag presentation and render-scoped schema queue for JSON-LD output.
//!
//! Views register `(model, mapping)` pairs on a [`RenderContext`] while a
//! page renders; at the end of the document body the context is flushed and
//! every schema becomes a `<script type="application/ld+json">` element, in
//! registration order.

pub mod context;
pub mod script;

pub use context::RenderContext;
pub use script::{SCRIPT_TYPE, ScriptWriter, render_script};

use thiserror::Error;

/// Errors that can occur while rendering schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Mapping error: {0}")]
    Mapping(#[from] ld_mapping::Error),

    #[error("Model error: {0}")]
    Model(#[from] ld_model::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
