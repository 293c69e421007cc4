//! evergreen-matrix CLI.
//!
//! Renders the build-variant matrix for Evergreen, lists and lints it, and
//! prints the mobile cross-compilation expansions for a single SDK or ABI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};

use evergreen_matrix::config::MatrixConfig;
use evergreen_matrix::document::{ConfigObject, Document};
use evergreen_matrix::logging::{self, LoggingGuard};
use evergreen_matrix::matrix::{all_variants, lint, matrix_document, select};
use evergreen_matrix::mobile::{android, ios};
use evergreen_matrix::render::{render, write_output, OutputFormat};
use evergreen_matrix::variant::Expansions;

#[derive(Parser)]
#[command(name = "evergreen-matrix")]
#[command(about = "Evergreen build-variant matrix generator")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ./evergreen-matrix.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the buildvariants document
    Generate {
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only emit the named variant (repeatable)
        #[arg(short, long = "variant")]
        variants: Vec<String>,
    },
    /// List variant names, host pools and display names
    List,
    /// Check the matrix for duplicate names and empty task lists
    Check,
    /// Print the expansions for one mobile target
    Flags {
        #[command(subcommand)]
        target: MobileTarget,

        /// Output format
        #[arg(short, long, value_enum, global = true)]
        format: Option<OutputFormat>,
    },
}

#[derive(Subcommand)]
enum MobileTarget {
    /// iOS SDK, e.g. iphoneos or iphonesimulator
    Ios {
        /// SDK name passed to xcrun
        sdk: String,
    },
    /// Android ABI, e.g. arm64-v8a or x86_64
    Android {
        /// NDK ABI name
        abi: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = logging::with_bootstrap(|| MatrixConfig::load(cli.config.as_deref()))
        .context("failed to load configuration")?;
    let _guard = init_logging(&config, cli.log_dir)?;

    match cli.command {
        Command::Generate {
            format,
            output,
            variants,
        } => {
            let format = format.unwrap_or(config.output.format);
            let output = output.or(config.output.path);
            let names = if variants.is_empty() {
                config.select.variants
            } else {
                variants
            };
            generate(format, output, &names)
        }
        Command::List => {
            list();
            Ok(())
        }
        Command::Check => check(),
        Command::Flags { target, format } => {
            let expansions = match &target {
                MobileTarget::Ios { sdk } => ios(sdk),
                MobileTarget::Android { abi } => android(abi),
            };
            let format = format.unwrap_or(config.output.format);
            let text = render(&expansions_document(&expansions), format)?;
            write_output(&text, None)?;
            Ok(())
        }
    }
}

fn init_logging(config: &MatrixConfig, log_dir: Option<PathBuf>) -> Result<Option<LoggingGuard>> {
    match log_dir.or_else(|| config.logging.dir.clone()) {
        Some(dir) => Ok(Some(logging::init_with_file(&dir, &config.logging.level)?)),
        None => {
            logging::init_cli(&config.logging.level);
            Ok(None)
        }
    }
}

fn generate(format: OutputFormat, output: Option<PathBuf>, names: &[String]) -> Result<()> {
    let variants = all_variants();
    let selected = select(&variants, names)?;
    info!(
        selected = selected.len(),
        total = variants.len(),
        format = ?format,
        "rendering build variants"
    );

    let text = render(&matrix_document(selected), format)?;
    write_output(&text, output.as_deref())?;
    Ok(())
}

fn list() {
    for variant in all_variants() {
        println!(
            "{:<24} {:<28} {}",
            variant.name(),
            variant.run_on(),
            variant.display_name()
        );
    }
}

fn check() -> Result<()> {
    let variants = all_variants();
    let problems = lint(&variants);
    if problems.is_empty() {
        println!("ok: {} variants", variants.len());
        return Ok(());
    }
    for problem in &problems {
        error!(%problem, "matrix problem");
    }
    anyhow::bail!("{} problem(s) found in {} variants", problems.len(), variants.len())
}

fn expansions_document(expansions: &Expansions) -> Document {
    expansions
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}
