//! # ld-cli
//!
//! Command line interface for generating schema.org JSON-LD.
//!
//! Reads a model (JSON or YAML) and a mapping file, then prints the JSON-LD
//! document, a script element, or an HTML page with the scripts injected at
//! the end of its body.

mod config;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use ld_mapping::{Interpreter, Mapping, MappingDsl, MissingPathPolicy};
use ld_render::{RenderContext, ScriptWriter};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "schema-ld")]
#[command(about = "Generate schema.org JSON-LD from declarative mappings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the JSON-LD document for one model
    Generate {
        /// Model file (.json, .yaml or .yml)
        #[arg(long)]
        model: PathBuf,

        /// Mapping file
        #[arg(long)]
        mapping: PathBuf,

        /// Wrap the document in a script element
        #[arg(long)]
        script: bool,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        /// Policy for paths missing from the model
        #[arg(long, value_enum)]
        missing_path: Option<PolicyArg>,
    },

    /// Check that a mapping file compiles
    Validate {
        /// Mapping file
        #[arg(long)]
        mapping: PathBuf,
    },

    /// Render several schemas as script elements, in the order given
    Render {
        /// Schema as MODEL=MAPPING; repeat for more schemas
        #[arg(long = "schema", value_name = "MODEL=MAPPING", required = true)]
        schemas: Vec<String>,

        /// HTML page to inject the scripts into, before `</body>`
        #[arg(long)]
        html: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        /// Policy for paths missing from the model
        #[arg(long, value_enum)]
        missing_path: Option<PolicyArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Error,
    Null,
    Omit,
}

impl From<PolicyArg> for MissingPathPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Error => Self::Error,
            PolicyArg::Null => Self::Null,
            PolicyArg::Omit => Self::Omit,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Invalid schema '{0}': expected MODEL=MAPPING")]
    SchemaSpec(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path).await?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            model,
            mapping,
            script,
            pretty,
            missing_path,
        } => {
            tracing::info!("Generating {} with {}", model.display(), mapping.display());
            let interpreter =
                Interpreter::with_options(config.interpret_options(missing_path.map(Into::into)));
            let writer = ScriptWriter::new().pretty(pretty || config.pretty);

            let model = load_model(&model).await?;
            let mapping = load_mapping(&mapping).await?;
            let document = interpreter.generate(&model, &mapping)?;

            let output = if script {
                writer.render(&document)?
            } else {
                writer.to_json(&document)?
            };
            println!("{output}");
        }
        Commands::Validate { mapping } => {
            tracing::info!("Validating {}", mapping.display());
            load_mapping(&mapping).await?;
            println!("{}: ok", mapping.display());
        }
        Commands::Render {
            schemas,
            html,
            pretty,
            missing_path,
        } => {
            tracing::info!("Rendering {} schema(s)", schemas.len());
            let interpreter =
                Interpreter::with_options(config.interpret_options(missing_path.map(Into::into)));
            let mut context = RenderContext::new()
                .with_interpreter(interpreter)
                .with_writer(ScriptWriter::new().pretty(pretty || config.pretty));

            for schema in &schemas {
                let (model_path, mapping_path) = schema
                    .split_once('=')
                    .ok_or_else(|| CliError::SchemaSpec(schema.clone()))?;
                let model = load_model(Path::new(model_path)).await?;
                let mapping = load_mapping(Path::new(mapping_path)).await?;
                context.add_schema(model, Arc::new(mapping));
            }

            let output = match html {
                Some(page) => {
                    let page_content = tokio::fs::read_to_string(&page)
                        .await
                        .with_context(|| format!("failed to read HTML file {}", page.display()))?;
                    context.inject_into(&page_content)?
                }
                None => context.flush()?,
            };
            println!("{output}");
        }
    }

    Ok(())
}

async fn load_model(path: &Path) -> anyhow::Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read model file {}", path.display()))?;

    let model = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML model {}", path.display()))?,
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON model {}", path.display()))?,
        _ => bail!(
            "unsupported model file {}: expected .json, .yaml or .yml",
            path.display()
        ),
    };
    Ok(model)
}

async fn load_mapping(path: &Path) -> anyhow::Result<Mapping> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read mapping file {}", path.display()))?;
    MappingDsl::parse(&content).with_context(|| format!("invalid mapping {}", path.display()))
}
