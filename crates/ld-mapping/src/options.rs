//! Interpreter options and missing-path policies

use serde::{Deserialize, Serialize};

/// The schema.org vocabulary URL, used for `@context` and enumeration members
pub const SCHEMA_ORG: &str = "https://schema.org";

/// Policy for a path that does not resolve against the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPathPolicy {
    /// Fail with `PathNotFound`, so typos in a mapping surface in testing
    #[default]
    Error,

    /// Emit `null` under the output key
    Null,

    /// Leave the output key out
    Omit,
}

/// Options controlling interpretation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretOptions {
    /// What to do when a path does not resolve
    pub missing_path: MissingPathPolicy,

    /// Vocabulary URL for `@context` and enumeration members
    pub context: String,
}

impl InterpretOptions {
    /// Strict options with the schema.org context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the missing-path policy
    #[must_use]
    pub fn with_missing_path(mut self, policy: MissingPathPolicy) -> Self {
        self.missing_path = policy;
        self
    }

    /// Set the vocabulary context URL
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            missing_path: MissingPathPolicy::Error,
            context: SCHEMA_ORG.to_string(),
        }
    }
}
