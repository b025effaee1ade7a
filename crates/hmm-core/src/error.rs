//! # Error Types
//!
//! Structured errors shared across the hmm crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! These errors describe *why* a single step failed. Whether that failure
//! blocks the whole call is decided by the [`crate::outcome`] layer, which
//! converts them into classified findings.

use thiserror::Error;

/// A value object constructor rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Amount text is not a plain decimal number.
    #[error("invalid monetary amount {0:?}: expected a decimal number")]
    InvalidAmount(String),

    /// Currency code is not three ASCII letters.
    #[error("invalid currency code {0:?}: expected three letters (ISO 4217)")]
    InvalidCurrency(String),

    /// A quantity was NaN or infinite.
    #[error("{quantity} must be a finite number, got {value}")]
    NonFinite {
        /// Name of the quantity (e.g., "dimension").
        quantity: &'static str,
        /// The rejected value, formatted.
        value: String,
    },

    /// Unit tag is not one of the known units.
    #[error("unknown {kind} unit {unit:?}")]
    UnknownUnit {
        /// Unit family ("dimension" or "volume").
        kind: &'static str,
        /// The rejected tag.
        unit: String,
    },

    /// Discount type tag is not recognised.
    #[error("unknown discount type {0:?}")]
    UnknownDiscountType(String),

    /// Date text matched none of the accepted formats.
    #[error("unrecognised date {0:?}")]
    InvalidDate(String),
}

/// A document fragment could not be decoded into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The fragment root has the wrong name.
    #[error("expected <{expected}> element, found <{found}>")]
    UnexpectedElement {
        /// Element name the decoder expects.
        expected: String,
        /// Element name actually present.
        found: String,
    },

    /// A mandatory child element is absent.
    #[error("<{parent}> is missing its <{child}> element")]
    MissingElement {
        /// Name of the element that should contain the child.
        parent: String,
        /// Name of the missing child.
        child: String,
    },

    /// A child is present but its text does not parse.
    #[error("<{element}> holds {text:?}: {reason}")]
    InvalidValue {
        /// Name of the element holding the bad text.
        element: String,
        /// The text that failed to parse.
        text: String,
        /// Why it failed.
        reason: String,
    },
}

impl DecodeError {
    /// Build a [`DecodeError::MissingElement`].
    pub fn missing(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::MissingElement {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Build a [`DecodeError::InvalidValue`].
    pub fn invalid(
        element: impl Into<String>,
        text: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            element: element.into(),
            text: text.into(),
            reason: reason.to_string(),
        }
    }
}

/// Content text is not a well-formed document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("content is not well-formed (at byte {position}): {reason}")]
pub struct ParseError {
    /// Byte offset in the input where parsing stopped.
    pub position: u64,
    /// Description of the problem.
    pub reason: String,
}

impl ParseError {
    /// Create a parse error at the given byte offset.
    pub fn new(position: u64, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

/// A lookup collaborator failed for a reason other than "not found".
///
/// "Not found" is expressed as `Ok(None)`; this error means the
/// collaborator itself could not answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backing store is unavailable.
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        /// Collaborator name (e.g., "note store").
        collaborator: String,
        /// Reason reported by the collaborator.
        reason: String,
    },

    /// The record exists but could not be read back as the requested type.
    #[error("record {id} is unreadable: {reason}")]
    Unreadable {
        /// Identifier of the unreadable record.
        id: i64,
        /// Why the record could not be read.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_names_elements() {
        let err = DecodeError::missing("Money", "Code");
        assert_eq!(err.to_string(), "<Money> is missing its <Code> element");

        let err = DecodeError::invalid("Value", "abc", "not a number");
        let display = err.to_string();
        assert!(display.contains("<Value>"));
        assert!(display.contains("\"abc\""));
    }
}
