//! # Codec Laws
//!
//! - Value round trip: `decode(encode(v)) == v`, also through text.
//! - Envelope idempotence: `unwrap(wrap(f, ns))` yields `f`, including
//!   text holding `<`, `>` and `&`.

use hmm_codec::{unwrap, wrap, Element, Envelope, ValueCodec};
use hmm_core::{CurrencyCode, Dimension, DimensionUnit, Money, Volume, VolumeUnit};
use proptest::prelude::*;

const NS: &str = "http://schema.hmm.com/2020";

fn currency() -> impl Strategy<Value = CurrencyCode> {
    "[A-Z]{3}".prop_map(|c| CurrencyCode::new(&c).unwrap())
}

fn money() -> impl Strategy<Value = Money> {
    (any::<bool>(), "[0-9]{1,15}", "[0-9]{0,6}", currency()).prop_map(|(neg, i, f, c)| {
        let sign = if neg { "-" } else { "" };
        Money::new(&format!("{sign}{i}.{f}"), c).unwrap()
    })
}

fn finite() -> impl Strategy<Value = f64> {
    prop_oneof![-1.0e12f64..1.0e12f64, Just(0.0), 0.0f64..1.0e-3]
}

fn dimension() -> impl Strategy<Value = Dimension> {
    (finite(), prop::sample::select(DimensionUnit::ALL.to_vec()))
        .prop_map(|(v, u)| Dimension::new(v, u).unwrap())
}

fn volume() -> impl Strategy<Value = Volume> {
    (finite(), prop::sample::select(VolumeUnit::ALL.to_vec()))
        .prop_map(|(v, u)| Volume::new(v, u).unwrap())
}

fn through_text<V: ValueCodec>(value: &V) -> V {
    let text = value.encode(Some(NS)).to_xml();
    V::decode(&Element::parse(&text).unwrap()).unwrap()
}

proptest! {
    #[test]
    fn money_round_trips(m in money()) {
        prop_assert_eq!(Money::decode(&m.encode(None)).unwrap(), m.clone());
        prop_assert_eq!(through_text(&m), m);
    }

    #[test]
    fn dimension_round_trips(d in dimension()) {
        prop_assert_eq!(Dimension::decode(&d.encode(None)).unwrap(), d);
        prop_assert_eq!(through_text(&d), d);
    }

    #[test]
    fn volume_round_trips(v in volume()) {
        prop_assert_eq!(Volume::decode(&v.encode(None)).unwrap(), v);
        prop_assert_eq!(through_text(&v), v);
    }

    /// Arbitrary printable text (markup characters included) survives
    /// wrap, parse and unwrap unchanged.
    #[test]
    fn envelope_preserves_leaf_text(text in "[ -~]{1,40}") {
        let fragment = Element::new("Automobile").with_text_child("Brand", text.clone());
        let wrapped = wrap(fragment, NS);
        let (root, ns) = unwrap(&wrapped).unwrap();
        prop_assert_eq!(ns.as_deref(), Some(NS));
        let envelope = Envelope::from_root(&root).unwrap();
        let brand = envelope.fragment().unwrap().child_text("Brand").unwrap();
        prop_assert_eq!(brand, text);
        prop_assert_eq!(envelope.to_xml(), wrapped);
    }
}

#[test]
fn outback_brackets_are_escaped_and_restored() {
    let fragment = Element::new("Automobile").with_text_child("Brand", "<Outback>");
    let wrapped = wrap(fragment.clone(), NS);
    assert!(wrapped.contains("&lt;Outback&gt;"));
    assert!(!wrapped.contains("<Outback>"));

    let (root, _) = unwrap(&wrapped).unwrap();
    let envelope = Envelope::from_root(&root).unwrap();
    let mut expected = fragment;
    expected.adopt_namespace(Some(NS));
    assert_eq!(envelope.fragment(), Some(&expected));
}
