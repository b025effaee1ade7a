//! # Value Objects: Money, Dimension, Volume
//!
//! Immutable quantities tagged with a currency or unit. Each is validated
//! at construction and compared by value.
//!
//! ## Money
//!
//! Amounts are stored as normalized decimal strings, never as floats.
//! Normalization strips a leading `+`, redundant leading zeros and trailing
//! fractional zeros, so `"025.50"` and `"25.5"` are the same amount.
//!
//! ## Units
//!
//! Unit tags are carried opaquely. No conversion between units happens
//! here; `Dimension::same_unit` is the only cross-value check.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

// ── Money ──────────────────────────────────────────────────────────────

/// ISO 4217 currency code, stored upper-case (e.g., "USD", "CAD").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, accepting any letter case.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidCurrency`] unless the code is exactly
    /// three ASCII letters.
    pub fn new(code: &str) -> Result<Self, ValueError> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(ValueError::InvalidCurrency(code.to_string()))
        }
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl FromStr for CurrencyCode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: String,
    currency: CurrencyCode,
}

impl Money {
    /// Create a monetary amount from decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidAmount`] if `amount` is not a plain
    /// decimal number (optional sign, digits, optional fraction).
    pub fn new(amount: &str, currency: CurrencyCode) -> Result<Self, ValueError> {
        let amount = normalize_amount(amount)
            .ok_or_else(|| ValueError::InvalidAmount(amount.to_string()))?;
        Ok(Self { amount, currency })
    }

    /// A zero amount in the given currency.
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: "0".to_string(),
            currency,
        }
    }

    /// The normalized decimal amount.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// The currency code.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == "0"
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero(CurrencyCode::default())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Normalize decimal text, or `None` if it is not a plain decimal number.
fn normalize_amount(raw: &str) -> Option<String> {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(s.len());
    if negative && !(int_part == "0" && frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

// ── Dimension ──────────────────────────────────────────────────────────

/// Unit of a linear dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionUnit {
    Millimetre,
    Centimetre,
    Metre,
    #[default]
    Kilometre,
    Inch,
    Foot,
    Mile,
}

impl DimensionUnit {
    /// All units, in declaration order.
    pub const ALL: [DimensionUnit; 7] = [
        Self::Millimetre,
        Self::Centimetre,
        Self::Metre,
        Self::Kilometre,
        Self::Inch,
        Self::Foot,
        Self::Mile,
    ];

    /// Canonical tag written into content.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millimetre => "Millimetre",
            Self::Centimetre => "Centimetre",
            Self::Metre => "Metre",
            Self::Kilometre => "Kilometre",
            Self::Inch => "Inch",
            Self::Foot => "Foot",
            Self::Mile => "Mile",
        }
    }
}

impl FromStr for DimensionUnit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ValueError::UnknownUnit {
                kind: "dimension",
                unit: s.to_string(),
            })
    }
}

impl std::fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A linear dimension (a distance or an odometer reading).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    value: f64,
    unit: DimensionUnit,
}

impl Dimension {
    /// Create a dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NonFinite`] for NaN or infinite values.
    pub fn new(value: f64, unit: DimensionUnit) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NonFinite {
                quantity: "dimension",
                value: value.to_string(),
            });
        }
        Ok(Self { value, unit })
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit tag.
    pub fn unit(&self) -> DimensionUnit {
        self.unit
    }

    /// Returns true if both dimensions carry the same unit tag.
    pub fn same_unit(&self, other: &Dimension) -> bool {
        self.unit == other.unit
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

// ── Volume ─────────────────────────────────────────────────────────────

/// Unit of a volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeUnit {
    Millilitre,
    #[default]
    Litre,
    Gallon,
}

impl VolumeUnit {
    /// All units, in declaration order.
    pub const ALL: [VolumeUnit; 3] = [Self::Millilitre, Self::Litre, Self::Gallon];

    /// Canonical tag written into content.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millilitre => "Millilitre",
            Self::Litre => "Litre",
            Self::Gallon => "Gallon",
        }
    }
}

impl FromStr for VolumeUnit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ValueError::UnknownUnit {
                kind: "volume",
                unit: s.to_string(),
            })
    }
}

impl std::fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A volume of fuel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    value: f64,
    unit: VolumeUnit,
}

impl Volume {
    /// Create a volume.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NonFinite`] for NaN or infinite values.
    pub fn new(value: f64, unit: VolumeUnit) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NonFinite {
                quantity: "volume",
                value: value.to_string(),
            });
        }
        Ok(Self { value, unit })
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit tag.
    pub fn unit(&self) -> VolumeUnit {
        self.unit
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
