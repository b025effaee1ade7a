//! # In-Memory Store and Store-Backed Lookups
//!
//! [`InMemoryNoteStore`] holds notes and catalogs in maps. It backs the
//! CLI (notes loaded from a JSON file) and tests.
//!
//! [`StoreAutomobileLookup`] and [`StoreDiscountLookup`] resolve gas log
//! references against any [`NoteStore`] by running the referenced note
//! through its own pipeline. A note that is absent, deleted or of another
//! subject is "not found"; a note that exists but cannot be read back is
//! a lookup fault.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use hmm_core::{AutomobileInfo, GasDiscount, LookupError, Note, NoteCatalog, NoteId};

use crate::automobile::AutomobileSerializer;
use crate::discount::GasDiscountSerializer;
use crate::entity::EntitySerializer;
use crate::lookup::{AutomobileLookup, DiscountLookup, NoteStore};
use crate::pipeline::NoteSerializer;

/// Error loading a notes file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be read.
    #[error("cannot read notes file '{path}': {reason}")]
    Read {
        /// Path to the notes file.
        path: String,
        /// Reason the file could not be read.
        reason: String,
    },

    /// The file is not a JSON array of notes.
    #[error("invalid notes JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two notes share an id.
    #[error("{0} appears more than once")]
    DuplicateNote(NoteId),
}

/// Notes and catalogs held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteStore {
    notes: BTreeMap<NoteId, Note>,
    catalogs: BTreeMap<String, NoteCatalog>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the given catalogs and no notes.
    pub fn with_catalogs(catalogs: impl IntoIterator<Item = NoteCatalog>) -> Self {
        let mut store = Self::new();
        for catalog in catalogs {
            store.insert_catalog(catalog);
        }
        store
    }

    /// Parse a JSON array of notes into the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] for malformed JSON and
    /// [`StoreError::DuplicateNote`] if an id repeats.
    pub fn load_notes_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let notes: Vec<Note> = serde_json::from_str(json)?;
        let count = notes.len();
        for note in notes {
            if self.notes.contains_key(&note.id) {
                return Err(StoreError::DuplicateNote(note.id));
            }
            self.notes.insert(note.id, note);
        }
        Ok(count)
    }

    /// Read a notes file into the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file cannot be read, otherwise
    /// as [`InMemoryNoteStore::load_notes_json`].
    pub fn load_notes_file(&mut self, path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let count = self.load_notes_json(&json)?;
        tracing::info!(path = %path.display(), notes = count, "notes loaded");
        Ok(count)
    }

    /// Save a note, assigning the next free id if it is unsaved.
    pub fn insert(&mut self, mut note: Note) -> NoteId {
        if note.id.is_unsaved() {
            let next = self.notes.keys().next_back().map_or(0, NoteId::value) + 1;
            note.id = NoteId(next.max(1));
        }
        let id = note.id;
        self.notes.insert(id, note);
        id
    }

    pub fn insert_catalog(&mut self, catalog: NoteCatalog) {
        self.catalogs.insert(catalog.name.clone(), catalog);
    }

    /// All notes, ordered by id.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteStore for InMemoryNoteStore {
    fn find_note_by_id(&self, id: NoteId) -> Result<Option<Note>, LookupError> {
        Ok(self.notes.get(&id).cloned())
    }

    fn find_catalog_by_name(&self, name: &str) -> Result<Option<NoteCatalog>, LookupError> {
        Ok(self.catalogs.get(name).cloned())
    }
}

/// Automobiles read from a note store.
#[derive(Debug, Clone)]
pub struct StoreAutomobileLookup<N> {
    store: N,
}

impl<N: NoteStore> StoreAutomobileLookup<N> {
    pub fn new(store: N) -> Self {
        Self { store }
    }
}

impl<N: NoteStore> AutomobileLookup for StoreAutomobileLookup<N> {
    fn get_by_id(&self, id: i64) -> Result<Option<AutomobileInfo>, LookupError> {
        load_entity(&self.store, id, AutomobileSerializer)
    }
}

/// Discount programs read from a note store.
#[derive(Debug, Clone)]
pub struct StoreDiscountLookup<N> {
    store: N,
}

impl<N: NoteStore> StoreDiscountLookup<N> {
    pub fn new(store: N) -> Self {
        Self { store }
    }
}

impl<N: NoteStore> DiscountLookup for StoreDiscountLookup<N> {
    fn get_by_id(&self, id: i64) -> Result<Option<GasDiscount>, LookupError> {
        load_entity(&self.store, id, GasDiscountSerializer)
    }
}

fn load_entity<N, S>(store: &N, id: i64, serializer: S) -> Result<Option<S::Entity>, LookupError>
where
    N: NoteStore,
    S: EntitySerializer,
{
    let Some(note) = store.find_note_by_id(NoteId(id))? else {
        return Ok(None);
    };
    if note.is_deleted || note.subject != serializer.subject() {
        return Ok(None);
    }
    let catalog = store
        .find_catalog_by_name(&note.catalog)?
        .ok_or_else(|| LookupError::Unreadable {
            id,
            reason: format!("catalog '{}' does not exist", note.catalog),
        })?;

    let read = NoteSerializer::new(serializer, catalog).deserialize(&note);
    match read.value {
        Some(entity) => Ok(Some(entity)),
        None => Err(LookupError::Unreadable {
            id,
            reason: read
                .outcome
                .findings()
                .iter()
                .find(|f| f.severity.is_blocking())
                .map_or_else(|| format!("rejected at {}", read.stage), |f| f.message.clone()),
        }),
    }
}
