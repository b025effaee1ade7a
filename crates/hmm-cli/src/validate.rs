//! # Validate Subcommand
//!
//! `hmm validate --catalog Automobile note.xml` checks envelope text
//! against the catalog's schema and prints the findings.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hmm_codec::Element;
use hmm_core::{FindingCode, Outcome};
use hmm_schema::{CatalogRegistry, SchemaValidator};

use crate::{exit_code, find_catalog, json_report, print_outcome, read_input};

/// Arguments for `hmm validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Envelope file to check (`-` reads standard input).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Catalog whose schema governs the content.
    #[arg(long, short)]
    pub catalog: String,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute `hmm validate`. Exit code 1 if the content fails.
pub fn run_validate(args: &ValidateArgs, registry: &CatalogRegistry) -> Result<u8> {
    let catalog = find_catalog(registry, &args.catalog)?;
    let text = read_input(&args.input)?;

    let mut outcome = Outcome::new();
    if let Ok(root) = Element::parse(&text) {
        let expected = Some(catalog.namespace.as_str()).filter(|ns| !ns.is_empty());
        if root.namespace() != expected {
            outcome.report(
                FindingCode::NamespaceMismatch,
                format!(
                    "content namespace {:?} differs from catalog namespace {:?}",
                    root.namespace(),
                    expected
                ),
            );
        }
    }
    outcome.extend(SchemaValidator::for_catalog(catalog).validate_text(&text));
    tracing::info!(
        catalog = %catalog.name,
        findings = outcome.len(),
        "content validated"
    );

    if args.json {
        println!("{}", json_report::<()>(None, &outcome)?);
    } else {
        println!("{} against catalog {}", args.input.display(), catalog.name);
        print_outcome(&outcome);
    }
    Ok(exit_code(&outcome))
}
