//! formwire CLI
//!
//! ```bash
//! formwire render signup.yaml --models schemas/
//! formwire fields schemas/contact.json --format yaml
//! formwire schema > form-wire.schema.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use formwire::{declaration, model_json_schema_to_fields, AnyForm, ModelRegistry, ModelSchema};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formwire")]
#[command(version)]
#[command(about = "Validate form declarations and emit the JSON a form renderer consumes", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, short, env = "FORMWIRE_FORMAT", default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a declaration file and print the finalized form
    Render {
        file: PathBuf,
        /// Directory of model JSON Schemas (`<name>.json`) for `ModelForm` declarations
        #[arg(long, env = "FORMWIRE_MODELS")]
        models: Option<PathBuf>,
    },
    /// Derive the form fields of a model JSON Schema
    Fields {
        schema: PathBuf,
        /// Model name for error messages, defaults to the file stem
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the JSON Schema of the form wire format
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
        })
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_env("FORMWIRE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Render { file, models } => {
            let mut registry = ModelRegistry::new();
            if let Some(dir) = models {
                registry
                    .load_dir(&dir)
                    .with_context(|| format!("Failed to load models from {}", dir.display()))?;
            }
            let form = declaration::load_file(&file, &registry)
                .with_context(|| format!("Failed to load declaration {}", file.display()))?;
            cli.format.render(&form)?
        }
        Commands::Fields { schema, name } => {
            let raw = fs::read_to_string(&schema)
                .with_context(|| format!("Failed to read {}", schema.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&raw).context("Model schema is not valid JSON")?;
            let name = name
                .or_else(|| schema.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
                .unwrap_or_else(|| "model".to_owned());
            let fields = model_json_schema_to_fields(&ModelSchema::from_value(name, value))?;
            cli.format.render(&fields)?
        }
        Commands::Schema => cli.format.render(&schemars::schema_for!(AnyForm))?,
    };

    println!("{output}");
    Ok(())
}
