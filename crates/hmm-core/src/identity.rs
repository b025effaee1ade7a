//! # Identity Newtypes
//!
//! Newtype wrappers for the integer identifiers hmm hands out. They keep a
//! note id from being passed where an author id is expected.

use serde::{Deserialize, Serialize};

/// Identifier of a persisted note. Zero means "not saved yet".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(pub i64);

/// Identifier of the author who owns a note.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AuthorId(pub i64);

impl NoteId {
    /// The id carried by entities that have never been persisted.
    pub const UNSAVED: NoteId = NoteId(0);

    /// Access the raw integer.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns true if the note has not been persisted.
    pub fn is_unsaved(&self) -> bool {
        self.0 <= 0
    }
}

impl AuthorId {
    /// Access the raw integer.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "note:{}", self.0)
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "author:{}", self.0)
    }
}
