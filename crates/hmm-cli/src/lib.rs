//! # hmm-cli: Note Tooling
//!
//! ## Subcommands
//!
//! - `validate`: check envelope text against a catalog schema
//! - `inspect`: read a stored note back into its entity
//! - `wrap`: wrap a content fragment (or text) in a catalog envelope
//! - `audit`: list catalog schema objects that admit undeclared elements
//!
//! Catalogs come from a directory holding `catalogs.yaml` (`--catalogs`,
//! or `HMM_CATALOG_DIR`, default `./schemas`).
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; handlers delegate to the library crates.
//! - Handlers return an exit code: 0 success, 1 content failed, errors
//!   propagate as `anyhow::Error`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use hmm_core::{Finding, NoteCatalog, Outcome, Verdict};
use hmm_schema::CatalogRegistry;

pub mod audit;
pub mod inspect;
pub mod validate;
pub mod wrap;

/// Load the catalog registry from `dir`.
pub fn load_registry(dir: &Path) -> Result<CatalogRegistry> {
    CatalogRegistry::load(dir)
        .with_context(|| format!("failed to load catalogs from {}", dir.display()))
}

/// Look up a catalog by name.
pub fn find_catalog<'a>(registry: &'a CatalogRegistry, name: &str) -> Result<&'a NoteCatalog> {
    registry.get(name).with_context(|| {
        format!(
            "unknown catalog '{name}' (known: {})",
            registry.names().join(", ")
        )
    })
}

/// Read a file argument; `-` reads standard input.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut text)
            .context("failed to read standard input")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Print findings, one per line, then the verdict.
pub fn print_outcome(outcome: &Outcome) {
    for finding in outcome.findings() {
        println!("  {finding}");
    }
    println!("Verdict: {:?}", outcome.verdict());
}

#[derive(Serialize)]
struct Report<'a, T> {
    value: Option<&'a T>,
    findings: &'a [Finding],
    verdict: Verdict,
}

/// JSON form of a report: the value, findings and verdict.
pub fn json_report<T: Serialize>(value: Option<&T>, outcome: &Outcome) -> Result<String> {
    let report = Report {
        value,
        findings: outcome.findings(),
        verdict: outcome.verdict(),
    };
    serde_json::to_string_pretty(&report).context("failed to render JSON report")
}

/// Exit code for an outcome.
pub fn exit_code(outcome: &Outcome) -> u8 {
    if outcome.success() {
        0
    } else {
        1
    }
}

/// Default catalog directory, relative to the working directory.
pub fn default_catalog_dir() -> PathBuf {
    PathBuf::from("schemas")
}
