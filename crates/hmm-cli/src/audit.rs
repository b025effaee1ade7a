//! # Audit Subcommand
//!
//! `hmm audit` lists, per catalog, the schema objects that leave
//! `additionalProperties` open. Undeclared elements under those objects
//! pass validation without a Warning.

use anyhow::{Context, Result};
use clap::Args;

use hmm_schema::{audit_additional_properties, CatalogRegistry};

/// Arguments for `hmm audit`.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Exit with code 1 if any schema leaves an object open.
    #[arg(long)]
    pub strict: bool,
}

/// Execute `hmm audit`.
pub fn run_audit(args: &AuditArgs, registry: &CatalogRegistry) -> Result<u8> {
    let mut open = 0usize;
    for catalog in registry.iter() {
        if !catalog.has_schema() {
            println!("{}: no schema, content is not validated", catalog.name);
            continue;
        }
        let schema: serde_json::Value = serde_json::from_str(&catalog.schema)
            .with_context(|| format!("catalog {} schema is not JSON", catalog.name))?;
        let findings = audit_additional_properties(&schema);
        if findings.is_empty() {
            println!("{}: ok", catalog.name);
        } else {
            println!("{}: {} open object(s)", catalog.name, findings.len());
            for finding in &findings {
                println!("{finding}");
            }
        }
        open += findings.len();
    }
    tracing::info!(catalogs = registry.len(), open, "schema audit finished");

    Ok(if args.strict && open > 0 { 1 } else { 0 })
}
