//! # Wrap Subcommand
//!
//! `hmm wrap --catalog Automobile car.xml` wraps a content fragment in the
//! catalog's envelope, validates the result, prints the envelope on
//! stdout and any findings on stderr. With `--text` the input is taken as
//! a plain-text body.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hmm_codec::{ContentBody, Element, Envelope};
use hmm_core::Outcome;
use hmm_schema::{CatalogRegistry, SchemaValidator};

use crate::{exit_code, find_catalog, read_input};

/// Arguments for `hmm wrap`.
#[derive(Args, Debug)]
pub struct WrapArgs {
    /// Fragment file (`-` reads standard input).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Catalog supplying namespace and schema.
    #[arg(long, short)]
    pub catalog: String,

    /// Treat the input as a plain-text body.
    #[arg(long)]
    pub text: bool,
}

/// Execute `hmm wrap`. Exit code 1 if the wrapped content fails its schema.
pub fn run_wrap(args: &WrapArgs, registry: &CatalogRegistry) -> Result<u8> {
    let catalog = find_catalog(registry, &args.catalog)?;
    let input = read_input(&args.input)?;

    let body = if args.text {
        ContentBody::Text(input)
    } else {
        ContentBody::Element(
            Element::parse(&input)
                .with_context(|| format!("{} is not a well-formed fragment", args.input.display()))?,
        )
    };
    let envelope = Envelope::new(body, &catalog.namespace);
    let outcome: Outcome = SchemaValidator::for_catalog(catalog)
        .validate_content(&envelope.content_element())
        .into_iter()
        .collect();

    println!("{}", envelope.to_xml());
    for finding in outcome.findings() {
        eprintln!("{finding}");
    }
    Ok(exit_code(&outcome))
}
