//! # Entity Records
//!
//! The typed records stored as note content. Identity (`id`, `author_id`)
//! belongs to the note, not to the content: serializers never write it
//! into a fragment and the note pipeline assigns it after extraction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::identity::{AuthorId, NoteId};
use crate::temporal::NoteDate;
use crate::value::{Dimension, Money, Volume};

/// Identity shared by every record persisted as a note.
pub trait HmmEntity {
    /// Id of the note holding this record.
    fn id(&self) -> NoteId;

    /// Author who owns the note.
    fn author_id(&self) -> AuthorId;

    /// Copy identity from the note the record was read from.
    fn assign_identity(&mut self, id: NoteId, author_id: AuthorId);
}

macro_rules! impl_hmm_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HmmEntity for $ty {
                fn id(&self) -> NoteId {
                    self.id
                }

                fn author_id(&self) -> AuthorId {
                    self.author_id
                }

                fn assign_identity(&mut self, id: NoteId, author_id: AuthorId) {
                    self.id = id;
                    self.author_id = author_id;
                }
            }
        )+
    };
}

impl_hmm_entity!(AutomobileInfo, GasDiscount, GasLog, TextNote);

/// A vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomobileInfo {
    pub id: NoteId,
    pub maker: String,
    pub brand: String,
    pub year: String,
    pub color: String,
    /// Vehicle identification number.
    pub pin: String,
    pub plate: String,
    /// Odometer reading when the record was last updated.
    pub meter_reading: i64,
    pub author_id: AuthorId,
}

/// How a discount amount applies to a purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountType {
    /// A fixed amount off the total.
    #[default]
    Flat,
    /// An amount off each unit of fuel.
    PerUnit,
}

impl DiscountType {
    /// Canonical tag written into content.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::PerUnit => "PerUnit",
        }
    }
}

impl FromStr for DiscountType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("Flat") => Ok(Self::Flat),
            t if t.eq_ignore_ascii_case("PerUnit") => Ok(Self::PerUnit),
            _ => Err(ValueError::UnknownDiscountType(s.to_string())),
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discount program (membership, loyalty card, credit-card rebate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasDiscount {
    pub id: NoteId,
    pub program: String,
    pub amount: Money,
    pub discount_type: DiscountType,
    pub is_active: bool,
    pub comment: String,
    pub author_id: AuthorId,
}

impl Default for GasDiscount {
    fn default() -> Self {
        Self {
            id: NoteId::UNSAVED,
            program: String::new(),
            amount: Money::default(),
            discount_type: DiscountType::default(),
            is_active: true,
            comment: String::new(),
            author_id: AuthorId::default(),
        }
    }
}

/// One discount applied to a fuel purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasDiscountInfo {
    pub amount: Money,
    /// The persisted program this discount came from.
    pub program: GasDiscount,
}

/// A fuel purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GasLog {
    pub id: NoteId,
    pub date: NoteDate,
    /// The vehicle fuelled; stored in content by id only.
    pub car: AutomobileInfo,
    pub distance: Dimension,
    pub current_meter_reading: Dimension,
    pub gas: Volume,
    pub price: Money,
    pub station: String,
    pub discounts: Vec<GasDiscountInfo>,
    pub comment: String,
    pub create_date: NoteDate,
    pub author_id: AuthorId,
}

/// A generic note whose content is plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNote {
    pub id: NoteId,
    pub subject: String,
    pub body: String,
    pub author_id: AuthorId,
}
