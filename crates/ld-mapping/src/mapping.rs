//! Mapping tree
//!
//! The typed form of a mapping. Text mappings are compiled into it by
//! [`crate::dsl::MappingDsl`]; code can build it directly with the
//! constructors below and seal it with [`Mapping::new`], which runs the same
//! checks the DSL compiler does.

use ld_model::{ModelPath, marker};
use regex::Regex;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::{Error, Result};

static TYPE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[A-Z][A-Za-z0-9]*$").expect("type name pattern is a valid regex")
});

/// Output key reserved for the document context
pub const CONTEXT_KEY: &str = "@context";

/// A validated mapping, ready to be interpreted against any number of models
#[derive(Debug, Clone)]
pub struct Mapping {
    root: MappingNode,
}

/// One level of a mapping tree
#[derive(Debug, Clone)]
pub enum MappingNode {
    /// `{"PostalAddress": {...}}`: an object whose first key is `@type`
    Type {
        type_name: String,
        body: Vec<Property>,
    },

    /// `{"[alumni": {"Person": {...}}}`: one typed object per model element
    Array {
        source: ArraySource,
        element_type: String,
        body: Vec<Property>,
    },

    /// `{"PostalAddress": [[...], [...]]}`: one typed object per body, each
    /// built from the same model
    TypeList {
        type_name: String,
        bodies: Vec<Vec<Property>>,
    },

    /// Plain properties, no `@type`
    Properties(Vec<Property>),
}

/// Where an array expansion reads its elements from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArraySource {
    /// `"[alumni"`: an explicit model path
    Path(ModelPath),

    /// `"["`: the output key the expansion is bound to
    EnclosingKey,
}

/// An output key and how its value is produced
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
}

/// How a property value is produced
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// Dotted lookup in the model
    Path(ModelPath),

    /// `":text"`: emitted verbatim
    Literal(String),

    /// `"@Member"`: emitted as `<context>/Member`
    Enumeration(String),

    /// Boolean or number, emitted unchanged
    Scalar(Scalar),

    /// Sub-mapping; the property key becomes its context key
    Nested(MappingNode),

    /// Value computed from the model by a function
    Computed(Computed),
}

/// Boolean or numeric mapping value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
}

/// Signature of a computed property
pub type ComputedFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A property computed from the model rather than looked up by path
#[derive(Clone)]
pub struct Computed(ComputedFn);

impl Mapping {
    /// Validate a tree built in code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypeName`] for a type or element type that is
    /// not a schema.org style name, [`Error::InvalidOutputKey`] for a key the
    /// DSL would read as something else, and [`Error::MissingArraySource`] for
    /// a root-level array expansion without a source path.
    pub fn new(root: MappingNode) -> Result<Self> {
        root.validate(None)?;
        Ok(Self { root })
    }

    /// Root node of the tree
    #[must_use]
    pub fn root(&self) -> &MappingNode {
        &self.root
    }
}

impl MappingNode {
    /// A typed object
    pub fn typed(type_name: impl Into<String>, body: Vec<Property>) -> Self {
        Self::Type {
            type_name: type_name.into(),
            body,
        }
    }

    /// Several typed objects of one type, all read from the same model
    pub fn typed_list(type_name: impl Into<String>, bodies: Vec<Vec<Property>>) -> Self {
        Self::TypeList {
            type_name: type_name.into(),
            bodies,
        }
    }

    /// An array expansion; `source` of `None` reads the enclosing key.
    ///
    /// # Errors
    ///
    /// Returns an error when `source` is not a valid model path.
    pub fn array(
        source: Option<&str>,
        element_type: impl Into<String>,
        body: Vec<Property>,
    ) -> Result<Self> {
        let source = match source {
            Some(path) => ArraySource::Path(ModelPath::parse(path)?),
            None => ArraySource::EnclosingKey,
        };
        Ok(Self::Array {
            source,
            element_type: element_type.into(),
            body,
        })
    }

    /// Plain properties
    #[must_use]
    pub fn properties(body: Vec<Property>) -> Self {
        Self::Properties(body)
    }

    fn validate(&self, context_key: Option<&str>) -> Result<()> {
        match self {
            Self::Type { type_name, body } => {
                check_type_name(type_name)?;
                validate_body(body)
            }
            Self::Array {
                source,
                element_type,
                body,
            } => {
                if *source == ArraySource::EnclosingKey {
                    let key = context_key.ok_or(Error::MissingArraySource)?;
                    ModelPath::parse(key)?;
                }
                check_type_name(element_type)?;
                validate_body(body)
            }
            Self::TypeList { type_name, bodies } => {
                check_type_name(type_name)?;
                bodies.iter().try_for_each(|body| validate_body(body))
            }
            Self::Properties(body) => validate_body(body),
        }
    }
}

fn validate_body(body: &[Property]) -> Result<()> {
    for property in body {
        check_output_key(property)?;
        if let PropertyValue::Nested(node) = &property.value {
            node.validate(Some(&property.key))?;
        }
    }
    Ok(())
}

/// Keys a text mapping would read as something else are rejected, as is the
/// document context key.
fn check_output_key(property: &Property) -> Result<()> {
    let key = property.key.as_str();
    let reason = if key == CONTEXT_KEY {
        "reserved for the document context"
    } else if key.starts_with(marker::ARRAY) {
        "begins with the array marker"
    } else if key.is_empty() {
        "is empty"
    } else if matches!(property.value, PropertyValue::Nested(_))
        && key.starts_with(|c: char| c.is_ascii_uppercase())
    {
        "a nested mapping under an uppercase key reads as a type"
    } else {
        return Ok(());
    };

    Err(Error::InvalidOutputKey {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

/// Check a type name against the schema.org naming convention.
///
/// # Errors
///
/// Returns [`Error::InvalidTypeName`] when the name does not match.
pub fn check_type_name(name: &str) -> Result<()> {
    if TYPE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidTypeName(name.to_string()))
    }
}

impl Property {
    /// `key: path`
    ///
    /// # Errors
    ///
    /// Returns an error when `path` is not a valid model path.
    pub fn path(key: impl Into<String>, path: &str) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            value: PropertyValue::Path(ModelPath::parse(path)?),
        })
    }

    /// A keyless path; the output key is its final segment.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` is not a valid model path.
    pub fn positional(path: &str) -> Result<Self> {
        let path = ModelPath::parse(path)?;
        Ok(Self {
            key: path.last_segment().to_string(),
            value: PropertyValue::Path(path),
        })
    }

    /// `key: ":text"`
    pub fn literal(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Literal(text.into()),
        }
    }

    /// `key: "@Member"`
    pub fn enumeration(key: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Enumeration(member.into()),
        }
    }

    /// `key: true` or `key: 42`
    pub fn scalar(key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Scalar(value.into()),
        }
    }

    /// `key: { ... }`
    pub fn nested(key: impl Into<String>, node: MappingNode) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Nested(node),
        }
    }

    /// A property whose value is computed from the model
    pub fn computed(
        key: impl Into<String>,
        func: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Computed(Computed(Arc::new(func))),
        }
    }
}

impl Computed {
    /// Evaluate against a model
    #[must_use]
    pub fn call(&self, model: &Value) -> Value {
        (self.0)(model)
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Computed(..)")
    }
}

impl Scalar {
    /// A finite floating point number; `None` for NaN or infinity
    #[must_use]
    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Self::Number)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
        }
    }
}
