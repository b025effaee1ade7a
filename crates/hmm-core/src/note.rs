//! # Note and Catalog Model
//!
//! A [`Note`] is the generic persisted record every entity type shares.
//! Its `content` is an envelope document whose inner element is named by
//! `subject`. The note's [`NoteCatalog`] decides which schema governs that
//! content and which namespace the envelope carries.
//!
//! Notes are owned by the storage collaborator. This crate only describes
//! their shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{AuthorId, NoteId};

/// Subject names: the inner element tag for each entity kind.
pub mod subject {
    /// Vehicle records.
    pub const AUTOMOBILE: &str = "Automobile";
    /// Discount programs.
    pub const GAS_DISCOUNT: &str = "GasDiscount";
    /// Fuel purchase logs.
    pub const GAS_LOG: &str = "GasLog";
    /// Generic plain-text notes.
    pub const TEXT_NOTE: &str = "HmmNote";
}

/// Per-entity-type configuration a note belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCatalog {
    pub name: String,
    /// Schema document text. Empty means content is not validated.
    #[serde(default)]
    pub schema: String,
    /// Namespace URI carried by the envelope root.
    pub namespace: String,
    /// Name of the default render for notes in this catalog.
    #[serde(default)]
    pub render: String,
}

impl NoteCatalog {
    /// A catalog without a schema.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: String::new(),
            namespace: namespace.into(),
            render: String::new(),
        }
    }

    /// Attach schema document text.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the default render name.
    pub fn with_render(mut self, render: impl Into<String>) -> Self {
        self.render = render.into();
        self
    }

    /// Returns true if content in this catalog is schema-validated.
    pub fn has_schema(&self) -> bool {
        !self.schema.trim().is_empty()
    }
}

/// The generic persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: NoteId,
    /// Entity kind; equals the inner element tag of `content`.
    pub subject: String,
    /// Envelope document text.
    pub content: String,
    /// Name of the catalog this note belongs to.
    pub catalog: String,
    #[serde(default)]
    pub author_id: AuthorId,
    #[serde(default)]
    pub create_date: DateTime<Utc>,
    #[serde(default)]
    pub last_modified_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    /// Opaque concurrency token managed by the store.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Note {
    /// An unsaved note stamped with the current time.
    pub fn draft(
        subject: impl Into<String>,
        content: impl Into<String>,
        catalog: impl Into<String>,
        author_id: AuthorId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::UNSAVED,
            subject: subject.into(),
            content: content.into(),
            catalog: catalog.into(),
            author_id,
            create_date: now,
            last_modified_date: now,
            description: None,
            version: None,
            is_deleted: false,
        }
    }

    /// Set the note id.
    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = id;
        self
    }
}
