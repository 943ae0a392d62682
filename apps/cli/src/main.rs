//! Command-line tool for FHIR resources
//!
//! Usage:
//!   ferrum-fhir normalize goal.json
//!   ferrum-fhir validate goal.json --preset lenient
//!   ferrum-fhir --log-format json validate goal.json --config validator.yaml

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ferrum_resources::validator::{BasicValidator, Preset, ValidatorConfig};
use ferrum_resources::{AnyResource, Validator};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "ferrum-fhir")]
#[command(about = "Normalize and validate FHIR JSON resources")]
#[command(version)]
struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a resource with its keys in canonical order
    Normalize {
        /// Resource JSON file
        file: PathBuf,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Validate a resource and print the OperationOutcome
    Validate {
        /// Resource JSON file
        file: PathBuf,

        /// Validator configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preset used when no configuration file is given
        #[arg(short, long, value_enum, default_value = "strict")]
        preset: PresetArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Strict,
    Lenient,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Strict => Preset::Strict,
            PresetArg::Lenient => Preset::Lenient,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init_logging(args.log_format, args.verbose);

    match args.command {
        Command::Normalize { file, compact } => normalize(&file, compact),
        Command::Validate {
            file,
            config,
            preset,
        } => validate(&file, config.as_deref(), preset.into()).await,
    }
}

fn read_resource(path: &Path) -> Result<AnyResource> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let resource = AnyResource::from_json(&json)
        .with_context(|| format!("Failed to decode resource in {}", path.display()))?;

    debug!(
        resource_type = resource.resource_type(),
        id = ?resource.id(),
        "decoded resource"
    );
    Ok(resource)
}

fn normalize(path: &Path, compact: bool) -> Result<ExitCode> {
    let resource = read_resource(path)?;
    let output = if compact {
        serde_json::to_string(&resource)?
    } else {
        serde_json::to_string_pretty(&resource)?
    };
    println!("{output}");
    Ok(ExitCode::SUCCESS)
}

async fn validate(path: &Path, config: Option<&Path>, preset: Preset) -> Result<ExitCode> {
    let config = match config {
        Some(config_path) => {
            let yaml = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            ValidatorConfig::from_yaml(&yaml).with_context(|| {
                format!("Invalid validator configuration in {}", config_path.display())
            })?
        }
        None => ValidatorConfig::preset(preset),
    };
    let validator =
        BasicValidator::from_config(&config).context("Failed to compile validation plan")?;

    let resource = read_resource(path)?;
    let outcome = validator
        .validate(resource.resource_type(), &resource.to_json())
        .await;

    info!(
        resource_type = resource.resource_type(),
        valid = outcome.valid,
        errors = outcome.error_count(),
        warnings = outcome.warning_count(),
        "validation finished"
    );
    println!("{}", serde_json::to_string_pretty(&outcome.to_operation_outcome())?);

    Ok(if outcome.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
