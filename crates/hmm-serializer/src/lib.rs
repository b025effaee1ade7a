//! # hmm-serializer: Entity Serialization Pipeline
//!
//! Turns typed entities into notes and notes back into entities.
//!
//! ## Architecture
//!
//! - **Entity serializers** (`automobile`, `discount`, `gas_log`, `note`):
//!   one [`EntitySerializer`] per entity kind, mapping the entity to its
//!   content fragment and back.
//! - **Pipeline** (`pipeline`): [`NoteSerializer`] wraps any entity
//!   serializer with the envelope codec and the catalog's schema validator,
//!   and carries note identity onto extracted entities.
//! - **Collaborators** (`lookup`, `store`): read-only traits for the note
//!   store and for the references gas logs hold, with an in-memory store
//!   and store-backed lookups.
//!
//! ## Key Design Principles
//!
//! - Every call builds its own [`hmm_core::Outcome`]; nothing is shared
//!   between calls.
//! - Expected problems with content are findings, never `Err` or panics.
//! - Lookups are plain sequential calls through narrow traits passed in at
//!   construction.
//!
//! ## Crate Policy
//!
//! - Depends on `hmm-core`, `hmm-codec` and `hmm-schema` internally.
//! - No `.unwrap()` outside tests.

pub mod automobile;
pub mod discount;
pub mod entity;
mod fields;
pub mod gas_log;
pub mod lookup;
pub mod note;
pub mod pipeline;
pub mod store;

pub use automobile::AutomobileSerializer;
pub use discount::GasDiscountSerializer;
pub use entity::EntitySerializer;
pub use gas_log::GasLogSerializer;
pub use lookup::{AutomobileLookup, DiscountLookup, NoteStore};
pub use note::TextNoteSerializer;
pub use pipeline::{Deserialized, NoteSerializer, Stage};
pub use store::{InMemoryNoteStore, StoreAutomobileLookup, StoreDiscountLookup, StoreError};
