//! # Temporal Types: Entity Dates
//!
//! Defines `NoteDate`, the wall-clock date-time carried inside entity
//! content (a fuel log's purchase date, its creation date).
//!
//! ## Accepted Text Forms
//!
//! Content written over the years uses three textual forms. Parsing tries
//! them in a fixed order and the first success wins:
//!
//! 1. Round-trip form: `YYYY-MM-DDTHH:MM:SS[.fffffff][offset]`, or a bare
//!    `YYYY-MM-DD`. An offset, when present, is dropped after reading the
//!    wall-clock time it qualifies.
//! 2. Legacy US form: `MM/DD/YYYY HH:MM:SS` or `MM/DD/YYYY`.
//! 3. Legacy compact form: `YYYYMMDD`.
//!
//! Empty or absent text maps to [`NoteDate::min()`], `0001-01-01T00:00:00`.
//!
//! ## Output Form
//!
//! [`NoteDate::to_round_trip()`] always writes the round-trip form with
//! seven fractional digits, e.g. `2020-01-15T08:30:00.0000000`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A wall-clock date-time without zone, as stored in entity content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteDate(NaiveDateTime);

/// One date-text parse strategy.
type ParseStrategy = fn(&str) -> Option<NaiveDateTime>;

/// Strategies in the order they are tried.
const PARSE_STRATEGIES: &[(&str, ParseStrategy)] = &[
    ("round-trip", parse_round_trip),
    ("legacy-us", parse_legacy_us),
    ("legacy-compact", parse_legacy_compact),
];

impl NoteDate {
    /// Wrap a `NaiveDateTime`.
    pub fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Sentinel used for empty or absent dates: `0001-01-01T00:00:00`.
    pub fn min() -> Self {
        let date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
        Self(NaiveDateTime::new(date, NaiveTime::default()))
    }

    /// Current local wall-clock time.
    pub fn now() -> Self {
        Self(chrono::Local::now().naive_local())
    }

    /// Build a date at midnight from calendar parts.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| Self(NaiveDateTime::new(d, NaiveTime::default())))
    }

    /// Returns true if this is the minimum-date sentinel.
    pub fn is_min(&self) -> bool {
        *self == Self::min()
    }

    /// Parse date text, trying each accepted form in order.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidDate`] if no strategy accepts the text.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::min());
        }
        PARSE_STRATEGIES
            .iter()
            .find_map(|(_, strategy)| strategy(text))
            .map(Self)
            .ok_or_else(|| ValueError::InvalidDate(text.to_string()))
    }

    /// Name of the legacy form `text` is written in (`legacy-us` or
    /// `legacy-compact`). `None` for round-trip, blank or unparsable text.
    pub fn legacy_form(text: &str) -> Option<&'static str> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        PARSE_STRATEGIES
            .iter()
            .find(|(_, strategy)| strategy(text).is_some())
            .map(|(name, _)| *name)
            .filter(|name| *name != "round-trip")
    }

    /// Parse optional date text; `None` maps to the minimum date.
    pub fn parse_optional(text: Option<&str>) -> Result<Self, ValueError> {
        match text {
            Some(t) => Self::parse(t),
            None => Ok(Self::min()),
        }
    }

    /// Access the inner `NaiveDateTime`.
    pub fn as_datetime(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Render in round-trip form with seven fractional digits.
    pub fn to_round_trip(&self) -> String {
        // 100ns ticks; a leap-second nanosecond value is clamped.
        let ticks = (self.0.nanosecond() / 100).min(9_999_999);
        format!("{}.{ticks:07}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl Default for NoteDate {
    fn default() -> Self {
        Self::min()
    }
}

impl std::fmt::Display for NoteDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_round_trip())
    }
}

impl From<NaiveDateTime> for NoteDate {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

fn parse_round_trip(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| NaiveDateTime::new(d, NaiveTime::default()))
        })
}

fn parse_legacy_us(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%m/%d/%Y %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%m/%d/%Y")
                .ok()
                .map(|d| NaiveDateTime::new(d, NaiveTime::default()))
        })
}

fn parse_legacy_compact(text: &str) -> Option<NaiveDateTime> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = text[0..4].parse().ok()?;
    let month = text[4..6].parse().ok()?;
    let day = text[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| NaiveDateTime::new(d, NaiveTime::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_form_names_the_strategy() {
        assert_eq!(NoteDate::legacy_form("04/02/2020 08:30:00"), Some("legacy-us"));
        assert_eq!(NoteDate::legacy_form("20200403"), Some("legacy-compact"));
        assert_eq!(NoteDate::legacy_form("2020-04-02T08:30:00.0000000"), None);
        assert_eq!(NoteDate::legacy_form("  "), None);
        assert_eq!(NoteDate::legacy_form("yesterday"), None);
    }

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NoteDate {
        NoteDate::new(
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap(),
        )
    }

    #[test]
    fn empty_text_is_min_date() {
        assert!(NoteDate::parse("").unwrap().is_min());
        assert!(NoteDate::parse("   ").unwrap().is_min());
        assert!(NoteDate::parse_optional(None).unwrap().is_min());
        assert_eq!(NoteDate::min().to_round_trip(), "0001-01-01T00:00:00.0000000");
    }

    #[test]
    fn round_trip_form_is_tried_first() {
        let parsed = NoteDate::parse("2020-01-15T08:30:05.0000000").unwrap();
        assert_eq!(parsed, ymd_hms(2020, 1, 15, 8, 30, 5));

        let with_offset = NoteDate::parse("2020-01-15T08:30:05-05:00").unwrap();
        assert_eq!(with_offset, ymd_hms(2020, 1, 15, 8, 30, 5));

        let date_only = NoteDate::parse("2020-01-15").unwrap();
        assert_eq!(date_only, ymd_hms(2020, 1, 15, 0, 0, 0));
    }

    #[test]
    fn legacy_forms_are_accepted() {
        assert_eq!(
            NoteDate::parse("01/15/2020 08:30:05").unwrap(),
            ymd_hms(2020, 1, 15, 8, 30, 5)
        );
        assert_eq!(
            NoteDate::parse("01/15/2020").unwrap(),
            ymd_hms(2020, 1, 15, 0, 0, 0)
        );
        assert_eq!(
            NoteDate::parse("20200115").unwrap(),
            ymd_hms(2020, 1, 15, 0, 0, 0)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            NoteDate::parse("yesterday"),
            Err(ValueError::InvalidDate(_))
        ));
        assert!(NoteDate::parse("20201301").is_err());
    }

    #[test]
    fn round_trip_output_reparses() {
        let dt = NoteDate::new(
            NaiveDate::from_ymd_opt(2021, 6, 30)
                .unwrap()
                .and_hms_nano_opt(23, 59, 58, 123_456_700)
                .unwrap(),
        );
        let text = dt.to_round_trip();
        assert_eq!(text, "2021-06-30T23:59:58.1234567");
        assert_eq!(NoteDate::parse(&text).unwrap(), dt);
    }
}
