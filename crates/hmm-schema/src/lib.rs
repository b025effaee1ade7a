//! # hmm-schema: Note Content Validation
//!
//! Validates note content against the schema document of the note's
//! catalog and classifies every discrepancy as a [`hmm_core::Finding`].
//!
//! ## Runtime Validation (`validate`)
//!
//! Catalog schemas are JSON Schema (draft 2020-12) documents. They are
//! evaluated over a JSON projection of the envelope's `<Content>` element:
//! elements with element children become objects keyed by child name
//! (repeated names become arrays), all other elements become their text.
//!
//! | Violation                                  | Severity |
//! |--------------------------------------------|----------|
//! | catalog has no schema                      | (none)   |
//! | content not well-formed                    | Error    |
//! | subject root element absent                | Error    |
//! | required child element absent              | Warning  |
//! | undeclared element present                 | Warning  |
//! | any other shape violation                  | Error    |
//! | schema unusable (bad JSON, fails to build) | Fatal    |
//!
//! ## Catalog Registry (`catalog`)
//!
//! Loads catalog definitions from a directory holding `catalogs.yaml` and
//! the schema files it names.
//!
//! ## Schema Audit (`audit`)
//!
//! Unknown elements are only reported where a schema closes its objects
//! with `additionalProperties: false`. The audit lists the places where it
//! does not.
//!
//! ## Crate Policy
//!
//! - Depends only on `hmm-core` and `hmm-codec` internally.
//! - Validation never fails across its boundary: it returns findings.

pub mod audit;
pub mod catalog;
pub mod validate;

pub use audit::{audit_additional_properties, AdditionalPropertiesFinding};
pub use catalog::{CatalogError, CatalogRegistry, MANIFEST_FILE};
pub use validate::{project, validate, CompiledSchema, SchemaValidationError, SchemaValidator};
