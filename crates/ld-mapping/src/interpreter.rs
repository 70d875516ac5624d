//! Mapping interpreter
//!
//! Walks a [`Mapping`] alongside a model and produces the JSON-LD tree.
//! Interpretation is pure: neither the mapping nor the model is modified,
//! and the same inputs always produce the same output, key order included.

use ld_model::{ModelPath, kind_of, to_model};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::{debug, warn};

use crate::mapping::{
    ArraySource, CONTEXT_KEY, Computed, Mapping, MappingNode, Property, PropertyValue,
};
use crate::options::{InterpretOptions, MissingPathPolicy};
use crate::{Error, Result};

/// Interpreter for mappings
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    options: InterpretOptions,
}

/// Something the model is asked for
enum Lookup<'m> {
    Path(&'m ModelPath),
    Computed(&'m Computed),
}

impl Interpreter {
    /// Create a strict interpreter for schema.org
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interpreter with explicit options
    #[must_use]
    pub fn with_options(options: InterpretOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &InterpretOptions {
        &self.options
    }

    /// Produce the JSON-LD document for `model`.
    ///
    /// The result is an object whose first key is `@context`. A mapping whose
    /// root is an array expansion binds the expanded array under `@graph`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] under the strict policy, or
    /// [`Error::NotASequence`] when an array source is not an array.
    pub fn generate(&self, model: &Value, mapping: &Mapping) -> Result<Value> {
        let mut document = Map::new();
        document.insert(
            CONTEXT_KEY.to_string(),
            Value::String(self.options.context.clone()),
        );

        match self.interpret(model, mapping.root(), None)? {
            Value::Object(fields) => document.extend(fields),
            graph => {
                document.insert("@graph".to_string(), graph);
            }
        }

        debug!(keys = document.len(), "generated JSON-LD document");
        Ok(Value::Object(document))
    }

    /// Produce the JSON-LD document for any serializable record.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be converted into a model, or
    /// any error of [`Interpreter::generate`].
    pub fn generate_from<T: Serialize + ?Sized>(
        &self,
        record: &T,
        mapping: &Mapping,
    ) -> Result<Value> {
        let model = to_model(record)?;
        self.generate(&model, mapping)
    }

    /// Interpret one mapping level.
    ///
    /// `context_key` is the output key the level is bound to; an array
    /// expansion without a source path reads the model under that key.
    ///
    /// # Errors
    ///
    /// See [`Interpreter::generate`]; additionally
    /// [`Error::MissingArraySource`] when an array expansion without a source
    /// path is interpreted with no context key.
    pub fn interpret(
        &self,
        model: &Value,
        node: &MappingNode,
        context_key: Option<&str>,
    ) -> Result<Value> {
        match node {
            MappingNode::Type { type_name, body } => {
                Ok(Value::Object(self.typed_object(model, type_name, body)?))
            }
            MappingNode::Array {
                source,
                element_type,
                body,
            } => self.expand_array(model, source, context_key, element_type, body),
            MappingNode::TypeList { type_name, bodies } => bodies
                .iter()
                .map(|body| {
                    self.typed_object(model, type_name, body)
                        .map(Value::Object)
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            MappingNode::Properties(body) => Ok(Value::Object(self.properties(model, body)?)),
        }
    }

    fn typed_object(
        &self,
        model: &Value,
        type_name: &str,
        body: &[Property],
    ) -> Result<Map<String, Value>> {
        let mut object = Map::new();
        object.insert("@type".to_string(), Value::String(type_name.to_string()));
        object.extend(self.properties(model, body)?);
        Ok(object)
    }

    fn expand_array(
        &self,
        model: &Value,
        source: &ArraySource,
        context_key: Option<&str>,
        element_type: &str,
        body: &[Property],
    ) -> Result<Value> {
        let enclosing;
        let path = match source {
            ArraySource::Path(path) => path,
            ArraySource::EnclosingKey => {
                let key = context_key.ok_or(Error::MissingArraySource)?;
                enclosing = ModelPath::parse(key)?;
                &enclosing
            }
        };

        let found = match path.resolve(model) {
            Ok(found) => found,
            Err(err) if matches!(self.options.missing_path, MissingPathPolicy::Error) => {
                return Err(err.into());
            }
            Err(_) => {
                warn!(path = %path, "array source not found, expanding to an empty array");
                return Ok(Value::Array(Vec::new()));
            }
        };

        let Value::Array(items) = found else {
            return Err(Error::NotASequence {
                path: path.to_string(),
                kind: kind_of(found).to_string(),
            });
        };

        let elements = items
            .iter()
            .map(|element| {
                self.typed_object(element, element_type, body)
                    .map(Value::Object)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(path = %path, element_type, count = elements.len(), "expanded array");
        Ok(Value::Array(elements))
    }

    fn properties(&self, model: &Value, body: &[Property]) -> Result<Map<String, Value>> {
        let mut object = Map::new();

        for property in body {
            let key = property.key.as_str();
            let value = match &property.value {
                PropertyValue::Nested(node) => self.interpret(model, node, Some(key))?,
                PropertyValue::Scalar(scalar) => Value::from(scalar.clone()),
                PropertyValue::Literal(text) => Value::String(text.clone()),
                PropertyValue::Enumeration(member) => {
                    Value::String(format!("{}/{member}", self.options.context))
                }
                PropertyValue::Path(path) => match self.lookup(model, Lookup::Path(path))? {
                    Some(found) => found.into_owned(),
                    None => continue,
                },
                PropertyValue::Computed(computed) => {
                    match self.lookup(model, Lookup::Computed(computed))? {
                        Some(found) => found.into_owned(),
                        None => continue,
                    }
                }
            };

            object.insert(property.key.clone(), value);
        }

        Ok(object)
    }

    /// Resolve a lookup, applying the missing-path policy.
    ///
    /// `Ok(None)` means the output key is to be left out.
    fn lookup<'m>(
        &self,
        model: &'m Value,
        lookup: Lookup<'_>,
    ) -> Result<Option<Cow<'m, Value>>> {
        let path = match lookup {
            Lookup::Computed(computed) => return Ok(Some(Cow::Owned(computed.call(model)))),
            Lookup::Path(path) => path,
        };

        match path.resolve(model) {
            Ok(found) => Ok(Some(Cow::Borrowed(found))),
            Err(err) => match self.options.missing_path {
                MissingPathPolicy::Error => Err(err.into()),
                MissingPathPolicy::Null => {
                    warn!(path = %path, "path not found, emitting null");
                    Ok(Some(Cow::Owned(Value::Null)))
                }
                MissingPathPolicy::Omit => {
                    warn!(path = %path, "path not found, omitting key");
                    Ok(None)
                }
            },
        }
    }
}

/// Produce the JSON-LD document for `model` with strict schema.org options.
///
/// # Errors
///
/// See [`Interpreter::generate`].
pub fn generate(model: &Value, mapping: &Mapping) -> Result<Value> {
    Interpreter::new().generate(model, mapping)
}
