//! Gas discount program fragments:
//!
//! ```text
//! <GasDiscount>
//!   <Program>Costco membership</Program>
//!   <Amount><Money><Value>0.08</Value><Code>CAD</Code></Money></Amount>
//!   <DiscountType>PerUnit</DiscountType>
//!   <IsActive>true</IsActive>
//!   <Comment/>
//! </GasDiscount>
//! ```

use hmm_codec::{encode_field, Element};
use hmm_core::{subject, DiscountType, GasDiscount, Money, Outcome};

use crate::entity::EntitySerializer;
use crate::fields::{parse_flag, Fields};

const PROGRAM: &str = "Program";
const AMOUNT: &str = "Amount";
const DISCOUNT_TYPE: &str = "DiscountType";
const IS_ACTIVE: &str = "IsActive";
const COMMENT: &str = "Comment";

#[derive(Debug, Clone, Copy, Default)]
pub struct GasDiscountSerializer;

impl EntitySerializer for GasDiscountSerializer {
    type Entity = GasDiscount;

    fn subject(&self) -> &'static str {
        subject::GAS_DISCOUNT
    }

    fn to_fragment(&self, discount: &GasDiscount, namespace: Option<&str>) -> Element {
        let mut fragment = Element::new(subject::GAS_DISCOUNT)
            .with_text_child(PROGRAM, &discount.program)
            .with_child(encode_field(AMOUNT, &discount.amount, namespace))
            .with_text_child(DISCOUNT_TYPE, discount.discount_type.as_str())
            .with_text_child(IS_ACTIVE, discount.is_active.to_string())
            .with_text_child(COMMENT, &discount.comment);
        fragment.adopt_namespace(namespace);
        fragment
    }

    fn from_fragment(&self, fragment: &Element, outcome: &mut Outcome) -> Option<GasDiscount> {
        let mut fields = Fields::new(fragment, outcome);
        let defaults = GasDiscount::default();
        let discount = GasDiscount {
            program: fields.text(PROGRAM),
            amount: fields.value::<Money>(AMOUNT).unwrap_or_default(),
            discount_type: fields
                .parse::<DiscountType>(DISCOUNT_TYPE)
                .unwrap_or_default(),
            is_active: fields
                .parse_with(IS_ACTIVE, parse_flag)
                .unwrap_or(defaults.is_active),
            comment: fields.text(COMMENT),
            ..defaults
        };
        fields.finish(discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmm_core::{CurrencyCode, FindingCode};

    fn costco() -> GasDiscount {
        GasDiscount {
            program: "Costco membership".into(),
            amount: Money::new("0.08", CurrencyCode::new("CAD").unwrap()).unwrap(),
            discount_type: DiscountType::PerUnit,
            is_active: false,
            comment: "gas bar only".into(),
            ..GasDiscount::default()
        }
    }

    #[test]
    fn fragment_text() {
        let fragment = GasDiscountSerializer.to_fragment(&costco(), None);
        assert_eq!(
            fragment.to_xml(),
            "<GasDiscount><Program>Costco membership</Program>\
             <Amount><Money><Value>0.08</Value><Code>CAD</Code></Money></Amount>\
             <DiscountType>PerUnit</DiscountType><IsActive>false</IsActive>\
             <Comment>gas bar only</Comment></GasDiscount>"
        );
    }

    #[test]
    fn reads_back_what_it_writes() {
        let mut outcome = Outcome::new();
        let fragment = GasDiscountSerializer.to_fragment(&costco(), Some("urn:x"));
        let read = GasDiscountSerializer.from_fragment(&fragment, &mut outcome);
        assert_eq!(read, Some(costco()));
        assert!(outcome.is_empty());
    }

    #[test]
    fn absent_flag_keeps_program_active() {
        let mut outcome = Outcome::new();
        let fragment = Element::new("GasDiscount").with_text_child("Program", "Petro points");
        let read = GasDiscountSerializer.from_fragment(&fragment, &mut outcome).unwrap();
        assert!(read.is_active);
        assert_eq!(read.discount_type, DiscountType::Flat);
        assert!(read.amount.is_zero());
    }

    #[test]
    fn flag_and_type_are_case_insensitive() {
        let mut outcome = Outcome::new();
        let fragment = Element::new("GasDiscount")
            .with_text_child("DiscountType", "perunit")
            .with_text_child("IsActive", "False");
        let read = GasDiscountSerializer.from_fragment(&fragment, &mut outcome).unwrap();
        assert!(!read.is_active);
        assert_eq!(read.discount_type, DiscountType::PerUnit);
    }

    #[test]
    fn bad_amount_is_error() {
        let mut outcome = Outcome::new();
        let fragment = Element::parse(
            "<GasDiscount><Amount><Money><Value>lots</Value><Code>CAD</Code></Money></Amount></GasDiscount>",
        )
        .unwrap();
        assert!(GasDiscountSerializer.from_fragment(&fragment, &mut outcome).is_none());
        assert!(outcome.has_code(FindingCode::InvalidValue));
        assert!(!outcome.success());
    }
}
