//! CLI configuration file

use anyhow::Context;
use ld_mapping::{InterpretOptions, MissingPathPolicy};
use serde::Deserialize;
use std::path::Path;

/// Settings read from `--config`; command line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Policy for paths missing from the model; quote `"null"` in YAML
    pub missing_path: MissingPathPolicy,

    /// Vocabulary context, schema.org when unset
    pub context: Option<String>,

    /// Indent generated JSON
    pub pretty: bool,
}

impl CliConfig {
    /// Load a YAML configuration file
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parse YAML configuration text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Interpreter options, with an optional policy override from the command line
    pub fn interpret_options(&self, missing_path: Option<MissingPathPolicy>) -> InterpretOptions {
        let options =
            InterpretOptions::new().with_missing_path(missing_path.unwrap_or(self.missing_path));
        match &self.context {
            Some(context) => options.with_context(context.clone()),
            None => options,
        }
    }
}
