//! # Value Codecs
//!
//! Fragment encodings for the tagged value objects:
//!
//! ```text
//! <Money><Value>12.5</Value><Code>CAD</Code></Money>
//! <Dimension><Value>300</Value><Unit>Kilometre</Unit></Dimension>
//! <Volume><Value>42.7</Value><Unit>Litre</Unit></Volume>
//! ```
//!
//! Inside an entity a value sits under a field element, e.g.
//! `<Price><Money>…</Money></Price>`; [`encode_field`] and
//! [`decode_field`] handle that extra level.
//!
//! Numbers are written with Rust's shortest round-trip float formatting,
//! so decoding an encoded value reproduces it exactly.

use hmm_core::{
    CurrencyCode, DecodeError, Dimension, DimensionUnit, Money, Volume, VolumeUnit,
};

use crate::document::Element;

const VALUE: &str = "Value";
const CODE: &str = "Code";
const UNIT: &str = "Unit";

/// Encode and decode a value object as a fragment.
pub trait ValueCodec: Sized {
    /// Root element name of the fragment.
    const ELEMENT: &'static str;

    /// Build the fragment in the given namespace.
    fn encode(&self, namespace: Option<&str>) -> Element;

    /// Read a value back from its fragment.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the root has the wrong name, a child is
    /// missing, or a child's text does not parse.
    fn decode(fragment: &Element) -> Result<Self, DecodeError>;
}

impl ValueCodec for Money {
    const ELEMENT: &'static str = "Money";

    fn encode(&self, namespace: Option<&str>) -> Element {
        let mut el = Element::new(Self::ELEMENT)
            .with_text_child(VALUE, self.amount())
            .with_text_child(CODE, self.currency().as_str());
        el.adopt_namespace(namespace);
        el
    }

    fn decode(fragment: &Element) -> Result<Self, DecodeError> {
        expect_name(fragment, Self::ELEMENT)?;
        let amount = fragment.child_text(VALUE)?;
        let code = fragment.child_text(CODE)?;
        let currency =
            CurrencyCode::new(&code).map_err(|e| DecodeError::invalid(CODE, code.as_str(), e))?;
        Money::new(&amount, currency).map_err(|e| DecodeError::invalid(VALUE, amount.as_str(), e))
    }
}

impl ValueCodec for Dimension {
    const ELEMENT: &'static str = "Dimension";

    fn encode(&self, namespace: Option<&str>) -> Element {
        let mut el = Element::new(Self::ELEMENT)
            .with_text_child(VALUE, self.value().to_string())
            .with_text_child(UNIT, self.unit().as_str());
        el.adopt_namespace(namespace);
        el
    }

    fn decode(fragment: &Element) -> Result<Self, DecodeError> {
        expect_name(fragment, Self::ELEMENT)?;
        let value = parse_quantity(fragment)?;
        let unit_text = fragment.child_text(UNIT)?;
        let unit: DimensionUnit = unit_text
            .parse()
            .map_err(|e| DecodeError::invalid(UNIT, unit_text.as_str(), e))?;
        Dimension::new(value, unit).map_err(|e| DecodeError::invalid(VALUE, value.to_string(), e))
    }
}

impl ValueCodec for Volume {
    const ELEMENT: &'static str = "Volume";

    fn encode(&self, namespace: Option<&str>) -> Element {
        let mut el = Element::new(Self::ELEMENT)
            .with_text_child(VALUE, self.value().to_string())
            .with_text_child(UNIT, self.unit().as_str());
        el.adopt_namespace(namespace);
        el
    }

    fn decode(fragment: &Element) -> Result<Self, DecodeError> {
        expect_name(fragment, Self::ELEMENT)?;
        let value = parse_quantity(fragment)?;
        let unit_text = fragment.child_text(UNIT)?;
        let unit: VolumeUnit = unit_text
            .parse()
            .map_err(|e| DecodeError::invalid(UNIT, unit_text.as_str(), e))?;
        Volume::new(value, unit).map_err(|e| DecodeError::invalid(VALUE, value.to_string(), e))
    }
}

/// Encode `value` under a field element: `<field><Money>…</Money></field>`.
pub fn encode_field<V: ValueCodec>(field: &str, value: &V, namespace: Option<&str>) -> Element {
    let mut el = Element::new(field).with_child(value.encode(namespace));
    el.adopt_namespace(namespace);
    el
}

/// Decode the value held by the named field of `parent`.
///
/// # Errors
///
/// Returns [`DecodeError::MissingElement`] if the field or its value
/// element is absent, or the value's own decode error.
pub fn decode_field<V: ValueCodec>(parent: &Element, field: &str) -> Result<V, DecodeError> {
    V::decode(parent.child(field)?.child(V::ELEMENT)?)
}

/// Like [`decode_field`], but an absent field yields `Ok(None)`.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the field is present but its value is
/// missing or malformed.
pub fn decode_optional_field<V: ValueCodec>(
    parent: &Element,
    field: &str,
) -> Result<Option<V>, DecodeError> {
    match parent.find_child(field) {
        Some(holder) => V::decode(holder.child(V::ELEMENT)?).map(Some),
        None => Ok(None),
    }
}

fn expect_name(fragment: &Element, expected: &str) -> Result<(), DecodeError> {
    if fragment.name() == expected {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedElement {
            expected: expected.to_string(),
            found: fragment.name().to_string(),
        })
    }
}

fn parse_quantity(fragment: &Element) -> Result<f64, DecodeError> {
    let text = fragment.child_text(VALUE)?;
    text.trim()
        .parse::<f64>()
        .map_err(|e| DecodeError::invalid(VALUE, text.as_str(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://schema.hmm.com/2020";

    fn cad(amount: &str) -> Money {
        Money::new(amount, CurrencyCode::new("CAD").unwrap()).unwrap()
    }

    #[test]
    fn money_fragment_shape() {
        let el = cad("58.23").encode(None);
        assert_eq!(el.to_xml(), "<Money><Value>58.23</Value><Code>CAD</Code></Money>");
    }

    #[test]
    fn dimension_fragment_shape() {
        let d = Dimension::new(300.0, DimensionUnit::Kilometre).unwrap();
        assert_eq!(
            d.encode(None).to_xml(),
            "<Dimension><Value>300</Value><Unit>Kilometre</Unit></Dimension>"
        );
    }

    #[test]
    fn encode_takes_namespace() {
        let el = Volume::new(40.5, VolumeUnit::Litre).unwrap().encode(Some(NS));
        assert_eq!(el.namespace(), Some(NS));
        assert_eq!(el.child("Unit").unwrap().namespace(), Some(NS));
    }

    #[test]
    fn decode_missing_children() {
        let no_code = Element::parse("<Money><Value>1</Value></Money>").unwrap();
        assert_eq!(
            Money::decode(&no_code).unwrap_err(),
            DecodeError::missing("Money", "Code")
        );

        let no_value = Element::parse("<Volume><Unit>Litre</Unit></Volume>").unwrap();
        assert_eq!(
            Volume::decode(&no_value).unwrap_err(),
            DecodeError::missing("Volume", "Value")
        );

        let no_unit = Element::parse("<Dimension><Value>1</Value></Dimension>").unwrap();
        assert_eq!(
            Dimension::decode(&no_unit).unwrap_err(),
            DecodeError::missing("Dimension", "Unit")
        );
    }

    #[test]
    fn decode_bad_text() {
        let bad_amount = Element::parse("<Money><Value>ten</Value><Code>CAD</Code></Money>").unwrap();
        assert!(matches!(
            Money::decode(&bad_amount),
            Err(DecodeError::InvalidValue { ref element, .. }) if element == "Value"
        ));

        let bad_unit =
            Element::parse("<Dimension><Value>1</Value><Unit>Parsec</Unit></Dimension>").unwrap();
        assert!(matches!(
            Dimension::decode(&bad_unit),
            Err(DecodeError::InvalidValue { ref element, .. }) if element == "Unit"
        ));

        let nan = Element::parse("<Volume><Value>NaN</Value><Unit>Litre</Unit></Volume>").unwrap();
        assert!(Volume::decode(&nan).is_err());
    }

    #[test]
    fn decode_wrong_root() {
        let el = Element::parse("<Volume><Value>1</Value><Unit>Litre</Unit></Volume>").unwrap();
        assert!(matches!(
            Dimension::decode(&el),
            Err(DecodeError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn field_helpers() {
        let parent = Element::new("GasLog").with_child(encode_field("Price", &cad("1.5"), Some(NS)));
        assert_eq!(decode_field::<Money>(&parent, "Price").unwrap(), cad("1.5"));
        assert!(decode_optional_field::<Money>(&parent, "Tip").unwrap().is_none());
        assert_eq!(
            decode_field::<Money>(&parent, "Tip").unwrap_err(),
            DecodeError::missing("GasLog", "Tip")
        );

        let hollow = Element::new("GasLog").with_child(Element::new("Price"));
        assert_eq!(
            decode_optional_field::<Money>(&hollow, "Price").unwrap_err(),
            DecodeError::missing("Price", "Money")
        );
    }
}
