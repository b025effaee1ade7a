//! # Collaborator Traits
//!
//! Narrow read-only views onto storage, injected at construction.
//!
//! Every method answers `Ok(None)` for "no such record" and `Err` only when
//! the collaborator itself could not answer. Serializers turn the first
//! into an Error finding and the second into a Fatal one.

use std::sync::Arc;

use hmm_core::{AutomobileInfo, GasDiscount, LookupError, Note, NoteCatalog, NoteId};

/// Resolves automobile ids referenced by gas logs.
pub trait AutomobileLookup {
    /// Automobile with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the lookup could not be performed.
    fn get_by_id(&self, id: i64) -> Result<Option<AutomobileInfo>, LookupError>;
}

/// Resolves discount program ids referenced by gas logs.
pub trait DiscountLookup {
    /// Discount program with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the lookup could not be performed.
    fn get_by_id(&self, id: i64) -> Result<Option<GasDiscount>, LookupError>;
}

/// Read access to persisted notes and catalogs.
pub trait NoteStore {
    /// Note with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the store could not be read.
    fn find_note_by_id(&self, id: NoteId) -> Result<Option<Note>, LookupError>;

    /// Catalog with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the store could not be read.
    fn find_catalog_by_name(&self, name: &str) -> Result<Option<NoteCatalog>, LookupError>;
}

impl<T: AutomobileLookup + ?Sized> AutomobileLookup for &T {
    fn get_by_id(&self, id: i64) -> Result<Option<AutomobileInfo>, LookupError> {
        (**self).get_by_id(id)
    }
}

impl<T: AutomobileLookup + ?Sized> AutomobileLookup for Arc<T> {
    fn get_by_id(&self, id: i64) -> Result<Option<AutomobileInfo>, LookupError> {
        (**self).get_by_id(id)
    }
}

impl<T: DiscountLookup + ?Sized> DiscountLookup for &T {
    fn get_by_id(&self, id: i64) -> Result<Option<GasDiscount>, LookupError> {
        (**self).get_by_id(id)
    }
}

impl<T: DiscountLookup + ?Sized> DiscountLookup for Arc<T> {
    fn get_by_id(&self, id: i64) -> Result<Option<GasDiscount>, LookupError> {
        (**self).get_by_id(id)
    }
}

impl<T: NoteStore + ?Sized> NoteStore for &T {
    fn find_note_by_id(&self, id: NoteId) -> Result<Option<Note>, LookupError> {
        (**self).find_note_by_id(id)
    }

    fn find_catalog_by_name(&self, name: &str) -> Result<Option<NoteCatalog>, LookupError> {
        (**self).find_catalog_by_name(name)
    }
}

impl<T: NoteStore + ?Sized> NoteStore for Arc<T> {
    fn find_note_by_id(&self, id: NoteId) -> Result<Option<Note>, LookupError> {
        (**self).find_note_by_id(id)
    }

    fn find_catalog_by_name(&self, name: &str) -> Result<Option<NoteCatalog>, LookupError> {
        (**self).find_catalog_by_name(name)
    }
}
