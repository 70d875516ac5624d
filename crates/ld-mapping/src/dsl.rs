//! Mapping DSL
//!
//! Compiles the text form of a mapping into a [`Mapping`]. The text form is
//! YAML (and therefore also JSON). A level is either a map of
//! `outputKey: value` entries or a sequence whose items are plain path
//! strings (positional entries, keyed by their final segment) or maps of
//! keyed entries:
//!
//! ```yaml
//! PostalAddress:
//!   - streetAddress
//!   - addressLocality: locality
//!   - postalCode
//! ```
//!
//! A level holding an array-marker key or a type key is that node; any
//! siblings are ignored. A type whose value is a sequence of sequences lists
//! several bodies, each producing one object of that type from the same
//! model:
//!
//! ```yaml
//! address:
//!   PostalAddress:
//!     - [home.streetAddress]
//!     - [work.streetAddress]
//! ```

use ld_model::{ModelPath, kind_of, marker};
use serde_json::Value;
use tracing::{debug, warn};

use crate::mapping::{
    ArraySource, Mapping, MappingNode, Property, PropertyValue, Scalar, check_type_name,
};
use crate::{Error, Result};

/// DSL parser
pub struct MappingDsl;

/// Parse error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, " at line {line}, column {col}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// A mapping entry before compilation; positional entries have no key
struct Entry<'a> {
    key: Option<&'a str>,
    index: usize,
    value: &'a Value,
}

impl MappingDsl {
    /// Create a new mapping DSL instance
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse and compile a mapping from YAML or JSON text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the text is not valid YAML, or any
    /// construction error raised while compiling the tree.
    pub fn parse(yaml: &str) -> Result<Mapping> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| ParseError {
            message: format!("Failed to parse DSL: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })?;
        Self::from_value(&value)
    }

    /// Parse a mapping from a file
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed or compiled.
    pub fn parse_file(path: &std::path::Path) -> Result<Mapping> {
        let content = std::fs::read_to_string(path).map_err(|e| ParseError {
            message: format!("Failed to read file {}: {e}", path.display()),
            line: None,
            column: None,
        })?;
        Self::parse(&content)
    }

    /// Compile an already parsed mapping value
    ///
    /// # Errors
    ///
    /// Returns the first construction error found in the tree.
    pub fn from_value(value: &Value) -> Result<Mapping> {
        let root = match value {
            Value::Object(_) | Value::Array(_) => compile_level(value, None)?,
            other => return Err(Error::invalid_value("<root>", kind_of(other))),
        };
        debug!(root = node_label(&root), "compiled mapping");
        Mapping::new(root)
    }
}

impl Default for MappingDsl {
    fn default() -> Self {
        Self::new()
    }
}

fn node_label(node: &MappingNode) -> &str {
    match node {
        MappingNode::Type { type_name, .. } => type_name,
        MappingNode::Array { element_type, .. } => element_type,
        MappingNode::TypeList { type_name, .. } => type_name,
        MappingNode::Properties(_) => "properties",
    }
}

fn entries(level: &Value) -> Vec<Entry<'_>> {
    match level {
        Value::Object(fields) => fields
            .iter()
            .enumerate()
            .map(|(index, (key, value))| Entry {
                key: Some(key.as_str()),
                index,
                value,
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .flat_map(|(index, item)| match item {
                Value::Object(fields) => fields
                    .iter()
                    .map(|(key, value)| Entry {
                        key: Some(key.as_str()),
                        index,
                        value,
                    })
                    .collect::<Vec<_>>(),
                other => vec![Entry {
                    key: None,
                    index,
                    value: other,
                }],
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn is_type_key(key: &str) -> bool {
    key.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn compile_level(level: &Value, context_key: Option<&str>) -> Result<MappingNode> {
    let entries = entries(level);
    let mut body = Vec::with_capacity(entries.len());

    for entry in &entries {
        let Some(key) = entry.key else {
            body.push(compile_positional(entry.index, entry.value)?);
            continue;
        };

        if let Some(source) = key.strip_prefix(marker::ARRAY) {
            warn_ignored_siblings(key, entries.len());
            return compile_array(key, source, entry.value, context_key);
        }

        if is_type_key(key) {
            warn_ignored_siblings(key, entries.len());
            check_type_name(key)?;
            if let Some(bodies) = type_list(entry.value) {
                return compile_type_list(key, bodies);
            }
            return Ok(MappingNode::Type {
                type_name: key.to_string(),
                body: compile_body(key, entry.value)?,
            });
        }

        body.push(compile_property(key, entry.value)?);
    }

    Ok(MappingNode::Properties(body))
}

/// A type value that is a sequence of sequences lists several bodies
fn type_list(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) if matches!(items.first(), Some(Value::Array(_))) => {
            Some(items.as_slice())
        }
        _ => None,
    }
}

fn compile_type_list(type_name: &str, bodies: &[Value]) -> Result<MappingNode> {
    let bodies = bodies
        .iter()
        .map(|body| match body {
            Value::Array(_) => compile_body(type_name, body),
            other => Err(Error::InvalidTypeBody {
                type_name: type_name.to_string(),
                found: format!("{} among a list of bodies", kind_of(other)),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(type_name, count = bodies.len(), "compiled type list");
    Ok(MappingNode::TypeList {
        type_name: type_name.to_string(),
        bodies,
    })
}

fn warn_ignored_siblings(key: &str, entry_count: usize) {
    if entry_count > 1 {
        warn!(
            key,
            ignored = entry_count - 1,
            "type and array nodes occupy their whole level; sibling entries ignored"
        );
    }
}

fn compile_array(
    key: &str,
    source: &str,
    value: &Value,
    context_key: Option<&str>,
) -> Result<MappingNode> {
    let source = if source.is_empty() {
        if context_key.is_none() {
            return Err(Error::MissingArraySource);
        }
        ArraySource::EnclosingKey
    } else {
        ArraySource::Path(ModelPath::parse(source)?)
    };

    let Value::Object(fields) = value else {
        return Err(Error::array_mismatch(
            key,
            format!("expected a single-entry type mapping, found {}", kind_of(value)),
        ));
    };

    let mut types = fields.iter();
    let (element_type, element) = match (types.next(), types.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(Error::array_mismatch(
                key,
                format!("expected exactly one type entry, found {}", fields.len()),
            ));
        }
    };

    if !is_type_key(element_type) {
        return Err(Error::array_mismatch(
            key,
            format!("'{element_type}' is not a type name"),
        ));
    }
    check_type_name(element_type)?;
    if type_list(element).is_some() {
        return Err(Error::array_mismatch(
            key,
            format!("element type '{element_type}' cannot list several bodies"),
        ));
    }

    Ok(MappingNode::Array {
        source,
        element_type: element_type.clone(),
        body: compile_body(element_type, element)?,
    })
}

fn compile_body(type_name: &str, value: &Value) -> Result<Vec<Property>> {
    if !matches!(value, Value::Object(_) | Value::Array(_)) {
        return Err(Error::invalid_value(type_name, kind_of(value)));
    }

    match compile_level(value, None)? {
        MappingNode::Properties(body) => Ok(body),
        MappingNode::Type { type_name: inner, .. }
        | MappingNode::TypeList { type_name: inner, .. } => Err(Error::InvalidTypeBody {
            type_name: type_name.to_string(),
            found: format!("nested type '{inner}'"),
        }),
        MappingNode::Array { .. } => Err(Error::InvalidTypeBody {
            type_name: type_name.to_string(),
            found: "an array expansion".to_string(),
        }),
    }
}

fn compile_positional(index: usize, value: &Value) -> Result<Property> {
    match value {
        Value::String(path) => Property::positional(path),
        other => Err(Error::PositionalEntry {
            index,
            found: kind_of(other).to_string(),
        }),
    }
}

fn compile_property(key: &str, value: &Value) -> Result<Property> {
    let value = match value {
        Value::Object(_) | Value::Array(_) => {
            PropertyValue::Nested(compile_level(value, Some(key))?)
        }
        Value::Bool(b) => PropertyValue::Scalar(Scalar::Bool(*b)),
        Value::Number(n) => PropertyValue::Scalar(Scalar::Number(n.clone())),
        Value::String(text) => compile_string(text)?,
        Value::Null => return Err(Error::invalid_value(key, "null")),
    };

    Ok(Property {
        key: key.to_string(),
        value,
    })
}

fn compile_string(text: &str) -> Result<PropertyValue> {
    if let Some(literal) = text.strip_prefix(marker::LITERAL) {
        Ok(PropertyValue::Literal(literal.to_string()))
    } else if let Some(member) = text.strip_prefix(marker::ENUMERATION) {
        Ok(PropertyValue::Enumeration(member.to_string()))
    } else {
        Ok(PropertyValue::Path(ModelPath::parse(text)?))
    }
}
