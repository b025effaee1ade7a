//! Child-element reading shared by the entity serializers.
//!
//! Absent or blank children read as `None` and the caller substitutes the
//! field default. A present child whose text does not parse records an
//! Error and marks the extraction failed.

use std::fmt::Display;
use std::str::FromStr;

use hmm_codec::{decode_optional_field, Element, ValueCodec};
use hmm_core::{Finding, FindingCode, NoteDate, Outcome};

pub(crate) struct Fields<'a> {
    root: &'a Element,
    outcome: &'a mut Outcome,
    failed: bool,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(root: &'a Element, outcome: &'a mut Outcome) -> Self {
        Self {
            root,
            outcome,
            failed: false,
        }
    }

    /// Text of a child, empty if absent.
    pub(crate) fn text(&self, name: &str) -> String {
        self.root.optional_child_text(name).unwrap_or_default()
    }

    pub(crate) fn parse<T>(&mut self, name: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.parse_with(name, |text| text.parse::<T>())
    }

    pub(crate) fn parse_with<T, E: Display>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Option<T> {
        let text = self.root.optional_child_text(name)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match parse(trimmed) {
            Ok(value) => Some(value),
            Err(e) => {
                self.invalid(name, format!("<{name}> value \"{trimmed}\" is invalid: {e}"));
                None
            }
        }
    }

    /// Tagged value under a holder child. A holder with no children and
    /// blank text reads as absent.
    pub(crate) fn value<V: ValueCodec>(&mut self, name: &str) -> Option<V> {
        let holder = self.root.find_child(name)?;
        if !holder.has_element_children() && holder.text().trim().is_empty() {
            return None;
        }
        match decode_optional_field::<V>(self.root, name) {
            Ok(value) => value,
            Err(e) => {
                self.invalid(name, e.to_string());
                None
            }
        }
    }

    /// Date child; absent or blank is the minimum date. A date in one of
    /// the legacy forms is accepted with an Info finding.
    pub(crate) fn date(&mut self, name: &str) -> NoteDate {
        let date = self.parse_with(name, NoteDate::parse);
        if date.is_some() {
            if let Some(form) = NoteDate::legacy_form(&self.text(name)) {
                let path = self.path(name);
                self.outcome.record(
                    Finding::new(FindingCode::LegacyDate, format!("<{name}> uses the {form} form"))
                        .at(path),
                );
            }
        }
        date.unwrap_or_default()
    }

    pub(crate) fn outcome(&mut self) -> &mut Outcome {
        &mut *self.outcome
    }

    pub(crate) fn path(&self, name: &str) -> String {
        format!("/{}/{name}", self.root.name())
    }

    /// The entity, unless a field failed to parse.
    pub(crate) fn finish<T>(self, entity: T) -> Option<T> {
        if self.failed {
            None
        } else {
            Some(entity)
        }
    }

    fn invalid(&mut self, name: &str, message: String) {
        let path = self.path(name);
        self.outcome
            .record(Finding::new(FindingCode::InvalidValue, message).at(path));
        self.failed = true;
    }
}

/// `true`/`false` in any letter case.
pub(crate) fn parse_flag(text: &str) -> Result<bool, String> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err("expected true or false".to_string())
    }
}
