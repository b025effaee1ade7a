//! # hmm CLI entry point
//!
//! Parses arguments, installs logging, loads the catalog registry and
//! dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hmm_cli::audit::{run_audit, AuditArgs};
use hmm_cli::inspect::{run_inspect, InspectArgs};
use hmm_cli::validate::{run_validate, ValidateArgs};
use hmm_cli::wrap::{run_wrap, WrapArgs};
use hmm_cli::{default_catalog_dir, load_registry};

/// Tools for hmm notes: validate, inspect and wrap note content.
#[derive(Parser, Debug)]
#[command(name = "hmm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// `RUST_LOG`, when set, takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    /// Directory holding catalogs.yaml and the catalog schemas.
    #[arg(long, global = true, env = "HMM_CATALOG_DIR", value_name = "DIR")]
    catalogs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check envelope text against a catalog schema.
    Validate(ValidateArgs),

    /// Read a stored note back into its entity.
    Inspect(InspectArgs),

    /// Wrap a content fragment in a catalog envelope.
    Wrap(WrapArgs),

    /// List schema objects that admit undeclared elements.
    Audit(AuditArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let catalog_dir = cli.catalogs.unwrap_or_else(default_catalog_dir);
    tracing::debug!(catalogs = %catalog_dir.display(), "hmm CLI starting");

    let result = load_registry(&catalog_dir).and_then(|registry| match &cli.command {
        Commands::Validate(args) => run_validate(args, &registry),
        Commands::Inspect(args) => run_inspect(args, &registry),
        Commands::Wrap(args) => run_wrap(args, &registry),
        Commands::Audit(args) => run_audit(args, &registry),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
