//! sgx-enable - Intel SGX capability detection and software enable
//!
//! Reports whether Intel SGX is enabled and, when the firmware supports it,
//! performs the software enable so SGX turns on after the next reboot.

use anyhow::{Context, Result};
use clap::Parser;
use sgx_enable::{
    config::SgxEnableConfig,
    report::{self, StatusReport},
    FsStore, NativeCpuid, SgxCapability,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sgx-enable")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Detect Intel SGX and perform the UEFI software enable")]
struct Cli {
    /// Report the enabling status only
    #[arg(short, long)]
    status: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors and --help both exit 1.
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayVersion => report::EXIT_SUCCESS,
                _ => report::EXIT_FAILURE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("sgx-enable: {:#}", e);
            ExitCode::from(report::EXIT_FAILURE)
        }
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sgx_enable={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<u8> {
    let config = load_config(cli.config.as_deref())?;
    let capability = SgxCapability::new(NativeCpuid, FsStore::new(), config)?;

    let report = report::evaluate(&capability, cli.status);
    print_report(&report, cli.json);

    Ok(report.exit_code)
}

fn load_config(path: Option<&Path>) -> Result<SgxEnableConfig> {
    let Some(path) = path else {
        return Ok(SgxEnableConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let config = SgxEnableConfig::from_toml(&content)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;

    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn print_report(report: &StatusReport, json: bool) {
    if json {
        println!("{}", report.to_json());
    } else if report.error_code.is_some() {
        eprintln!("{}", report.message);
    } else {
        println!("{}", report.message);
    }
}
