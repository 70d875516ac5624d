//! Render-scoped schema queue
//!
//! A [`RenderContext`] belongs to exactly one page render. Schemas are added
//! while the view renders and the whole queue is consumed at the end of the
//! document body, so nothing outlives the render it was registered in.

use ld_mapping::{Interpreter, Mapping};
use ld_model::to_model;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::script::ScriptWriter;
use crate::{Error, Result};

const BODY_END: &str = "</body>";

/// A schema waiting to be rendered
#[derive(Debug, Clone)]
struct QueuedSchema {
    model: Value,
    mapping: Arc<Mapping>,
}

/// Schemas registered during one page render
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Registered schemas, in registration order
    schemas: Vec<QueuedSchema>,

    /// Interpreter used when flushing
    interpreter: Interpreter,

    /// Script element writer used when flushing
    writer: ScriptWriter,
}

impl RenderContext {
    /// Create an empty context with strict schema.org interpretation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a configured interpreter
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Use a configured script writer
    #[must_use]
    pub fn with_writer(mut self, writer: ScriptWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Queue a schema for this render
    pub fn add_schema(&mut self, model: Value, mapping: Arc<Mapping>) {
        self.schemas.push(QueuedSchema { model, mapping });
    }

    /// Queue a schema whose model is any serializable record
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be converted into a model.
    pub fn add_record<T: Serialize + ?Sized>(
        &mut self,
        record: &T,
        mapping: Arc<Mapping>,
    ) -> Result<()> {
        let model = to_model(record)?;
        self.add_schema(model, mapping);
        Ok(())
    }

    /// Number of queued schemas
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schema has been queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Generate every queued document, in registration order
    ///
    /// # Errors
    ///
    /// Returns the first interpretation error.
    pub fn documents(&self) -> Result<Vec<Value>> {
        self.schemas
            .iter()
            .map(|schema| {
                self.interpreter
                    .generate(&schema.model, &schema.mapping)
                    .map_err(Error::from)
            })
            .collect()
    }

    /// Render every queued schema as consecutive script elements and close
    /// the context
    ///
    /// # Errors
    ///
    /// Returns the first interpretation or serialization error.
    pub fn flush(self) -> Result<String> {
        let mut output = String::new();
        for document in self.documents()? {
            output.push_str(&self.writer.render(&document)?);
        }

        debug!(schema_count = self.schemas.len(), "Flushed render context");
        Ok(output)
    }

    /// Flush into an HTML document, right before its last `</body>` tag.
    ///
    /// The tag is matched case-insensitively. A document without one gets
    /// the scripts appended at the end.
    ///
    /// # Errors
    ///
    /// Returns the first interpretation or serialization error.
    pub fn inject_into(self, html: &str) -> Result<String> {
        if self.is_empty() {
            return Ok(html.to_string());
        }

        let scripts = self.flush()?;
        let position = html.to_ascii_lowercase().rfind(BODY_END).unwrap_or(html.len());

        let mut output = String::with_capacity(html.len() + scripts.len());
        output.push_str(&html[..position]);
        output.push_str(&scripts);
        output.push_str(&html[position..]);
        Ok(output)
    }
}
