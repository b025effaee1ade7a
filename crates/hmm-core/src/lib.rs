//! # hmm-core: Foundational Types for hmm Notes
//!
//! Every typed record in hmm (vehicles, discount programs, fuel logs) is
//! persisted as a generic [`Note`]: metadata plus an opaque content blob
//! whose shape is governed by the note's [`NoteCatalog`]. This crate holds
//! the types shared by every layer that produces or consumes that content.
//!
//! ## Key Design Principles
//!
//! 1. **Value objects are immutable and validated at construction.**
//!    `Money` amounts are decimal strings, never floats. `Dimension` and
//!    `Volume` reject non-finite quantities. Equality is value-based.
//!
//! 2. **Findings, not panics.** Expected validation outcomes are reported
//!    as [`Finding`]s collected in an [`Outcome`]. Only the caller decides
//!    whether a `Warning` is acceptable.
//!
//! 3. **One outcome per call.** An `Outcome` is created fresh for each
//!    logical serialize/deserialize call and merged upward explicitly.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hmm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod entity;
pub mod error;
pub mod identity;
pub mod note;
pub mod outcome;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use entity::{
    AutomobileInfo, DiscountType, GasDiscount, GasDiscountInfo, GasLog, HmmEntity, TextNote,
};
pub use error::{DecodeError, LookupError, ParseError, ValueError};
pub use identity::{AuthorId, NoteId};
pub use note::{subject, Note, NoteCatalog};
pub use outcome::{Finding, FindingCode, Outcome, Reported, Severity, Verdict};
pub use temporal::NoteDate;
pub use value::{CurrencyCode, Dimension, DimensionUnit, Money, Volume, VolumeUnit};
