//! modelgen - data-context model generator
//!
//! Command-line front-end: checks eligibility, inspects source files and
//! generates model files for data-context classes of a solution.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use clap::{Parser, Subcommand};
use modelgen::{absolute, Session, SessionOptions};
use modelgen_pipeline::{Eligibility, PipelineFailure, PipelineOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(about = "Generate model files for data-context classes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Solution file (defaults to the nearest .sln above the source file)
    #[arg(short, long, value_name = "SLN", global = true)]
    solution: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Also require a declaration deriving from the configured base type
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a source file is an eligible data context
    Check {
        /// Source file
        file: PathBuf,
    },
    /// Print the declarations and namespace of a source file
    Inspect {
        /// Source file
        file: PathBuf,
    },
    /// Generate the model file for a data-context source file
    Generate {
        /// Source file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "modelgen={level},modelgen_core={level},modelgen_languages={level},\
             modelgen_project={level},modelgen_pipeline={level}"
        ))
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let options = SessionOptions {
        solution: cli.solution,
        config: cli.config,
        strict: cli.strict,
    };

    match cli.command {
        Commands::Check { file } => check(&absolute(&file)?, &options),
        Commands::Inspect { file } => inspect(&absolute(&file)?),
        Commands::Generate { file } => generate(&absolute(&file)?, &options),
    }
}

fn check(file: &std::path::Path, options: &SessionOptions) -> Result<ExitCode> {
    let session = Session::open(file, options)?;
    match session.check(file) {
        Ok(Eligibility::Eligible { source, .. }) => {
            println!("eligible: {} ({})", source.path().display(), source.project());
            Ok(ExitCode::SUCCESS)
        }
        Ok(Eligibility::Ineligible(reason)) => {
            println!("not eligible: {reason:?}");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => Ok(report_failure(&failure)),
    }
}

fn inspect(file: &std::path::Path) -> Result<ExitCode> {
    let inspection = modelgen_languages::inspect_file(file)?;

    match &inspection.namespace {
        Some(namespace) => println!("namespace {}", namespace.full_name),
        None => println!("(no namespace)"),
    }
    for declaration in &inspection.declarations {
        if declaration.base_types.is_empty() {
            println!("{} {}", declaration.kind, declaration.name);
        } else {
            println!(
                "{} {} : {}",
                declaration.kind,
                declaration.name,
                declaration.base_types.join(", ")
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn generate(file: &std::path::Path, options: &SessionOptions) -> Result<ExitCode> {
    let session = Session::open(file, options)?;
    debug!(
        "Generating with suffix '{}' and policy {:?}",
        session.config().eligibility.suffix,
        session.config().eligibility.policy
    );

    match session.generate(file) {
        Ok(PipelineOutcome::Completed(artifact)) => {
            println!("{}", artifact.path.display());
            Ok(ExitCode::SUCCESS)
        }
        Ok(PipelineOutcome::NotEligible(reason)) => {
            println!("not eligible: {reason:?}");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => Ok(report_failure(&failure)),
    }
}

fn report_failure(failure: &PipelineFailure) -> ExitCode {
    error!(stage = %failure.stage, operation = failure.operation, "{}", failure.source);
    for (depth, message) in failure.chain().iter().enumerate() {
        if depth == 0 {
            eprintln!("Error: {message}");
        } else {
            eprintln!("  caused by: {message}");
        }
    }
    ExitCode::FAILURE
}
