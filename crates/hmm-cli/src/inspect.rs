//! # Inspect Subcommand
//!
//! `hmm inspect --store notes.json 12` reads note 12 back into its entity,
//! resolving gas log references against the same store, and prints the
//! entity as JSON together with the findings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hmm_core::{subject, NoteId};
use hmm_schema::CatalogRegistry;
use hmm_serializer::{
    AutomobileSerializer, Deserialized, GasDiscountSerializer, GasLogSerializer,
    InMemoryNoteStore, NoteSerializer, NoteStore, StoreAutomobileLookup, StoreDiscountLookup,
    TextNoteSerializer,
};

use crate::{exit_code, json_report, print_outcome};

/// Arguments for `hmm inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Notes file: a JSON array of notes.
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,

    /// Id of the note to read.
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute `hmm inspect`. Exit code 1 if the note cannot be read cleanly.
pub fn run_inspect(args: &InspectArgs, registry: &CatalogRegistry) -> Result<u8> {
    let mut store = InMemoryNoteStore::with_catalogs(registry.iter().cloned());
    store
        .load_notes_file(&args.store)
        .context("failed to load notes store")?;

    let note = store
        .find_note_by_id(NoteId(args.id))?
        .with_context(|| format!("note {} not found in {}", args.id, args.store.display()))?;
    let catalog = store
        .find_catalog_by_name(&note.catalog)?
        .with_context(|| format!("note {} names unknown catalog '{}'", args.id, note.catalog))?;
    tracing::info!(note = %note.id, subject = %note.subject, catalog = %catalog.name, "inspecting note");

    match note.subject.as_str() {
        subject::AUTOMOBILE => report(
            NoteSerializer::new(AutomobileSerializer, catalog).deserialize(&note),
            args.json,
        ),
        subject::GAS_DISCOUNT => report(
            NoteSerializer::new(GasDiscountSerializer, catalog).deserialize(&note),
            args.json,
        ),
        subject::GAS_LOG => {
            let serializer = GasLogSerializer::new(
                StoreAutomobileLookup::new(&store),
                StoreDiscountLookup::new(&store),
            );
            report(
                NoteSerializer::new(serializer, catalog).deserialize(&note),
                args.json,
            )
        }
        _ => report(
            NoteSerializer::new(TextNoteSerializer, catalog).deserialize(&note),
            args.json,
        ),
    }
}

fn report<T: Serialize>(read: Deserialized<T>, json: bool) -> Result<u8> {
    if json {
        println!("{}", json_report(read.value.as_ref(), &read.outcome)?);
    } else {
        println!("Stage: {}", read.stage);
        if let Some(value) = &read.value {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("failed to render entity")?
            );
        }
        print_outcome(&read.outcome);
    }
    Ok(exit_code(&read.outcome))
}
