//! # hmm-codec: Note Content Codecs
//!
//! Converts between note content text and typed structures.
//!
//! ## Document Tree (`document`)
//!
//! [`Element`] is a tagged node with ordered, named children. Parsing
//! rejects anything that is not well-formed. Child lookups return
//! `Result<&Element, NotFound>` so every "element missing" path is explicit.
//!
//! ## Envelope (`envelope`)
//!
//! Every note's content has the same outer shape:
//!
//! ```text
//! <Note xmlns="{catalog namespace}"><Content>{fragment or text}</Content></Note>
//! ```
//!
//! [`Envelope`] wraps and unwraps that shape and refuses to nest an
//! envelope inside another.
//!
//! ## Value Codecs (`values`)
//!
//! [`ValueCodec`] encodes `Money`, `Dimension` and `Volume` as small
//! fragments (`<Money><Value/><Code/></Money>` and friends) and decodes
//! them back. `decode(encode(v)) == v` for every valid value.
//!
//! ## Crate Policy
//!
//! - Depends only on `hmm-core` internally.
//! - The writer output is canonical: one serialization per tree.

pub mod document;
pub mod envelope;
pub mod values;

pub use document::{Element, Node, NotFound, MAX_DEPTH};
pub use envelope::{unwrap, wrap, ContentBody, Envelope, EnvelopeError, CONTENT, ROOT};
pub use values::{decode_field, decode_optional_field, encode_field, ValueCodec};
