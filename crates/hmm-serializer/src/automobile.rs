//! Automobile fragments:
//!
//! ```text
//! <Automobile>
//!   <Maker>Subaru</Maker><Brand>Outback</Brand><Year>2017</Year>
//!   <Color>Blue</Color><Pin>135</Pin><Plate>BCTT208</Plate>
//!   <MeterReading>1234535</MeterReading>
//! </Automobile>
//! ```

use hmm_codec::Element;
use hmm_core::{subject, AutomobileInfo, Outcome};

use crate::entity::EntitySerializer;
use crate::fields::Fields;

const MAKER: &str = "Maker";
const BRAND: &str = "Brand";
const YEAR: &str = "Year";
const COLOR: &str = "Color";
const PIN: &str = "Pin";
const PLATE: &str = "Plate";
const METER_READING: &str = "MeterReading";

#[derive(Debug, Clone, Copy, Default)]
pub struct AutomobileSerializer;

impl EntitySerializer for AutomobileSerializer {
    type Entity = AutomobileInfo;

    fn subject(&self) -> &'static str {
        subject::AUTOMOBILE
    }

    fn to_fragment(&self, car: &AutomobileInfo, namespace: Option<&str>) -> Element {
        let mut fragment = Element::new(subject::AUTOMOBILE)
            .with_text_child(MAKER, &car.maker)
            .with_text_child(BRAND, &car.brand)
            .with_text_child(YEAR, &car.year)
            .with_text_child(COLOR, &car.color)
            .with_text_child(PIN, &car.pin)
            .with_text_child(PLATE, &car.plate)
            .with_text_child(METER_READING, car.meter_reading.to_string());
        fragment.adopt_namespace(namespace);
        fragment
    }

    fn from_fragment(&self, fragment: &Element, outcome: &mut Outcome) -> Option<AutomobileInfo> {
        let mut fields = Fields::new(fragment, outcome);
        let car = AutomobileInfo {
            maker: fields.text(MAKER),
            brand: fields.text(BRAND),
            year: fields.text(YEAR).trim().to_string(),
            color: fields.text(COLOR),
            pin: fields.text(PIN),
            plate: fields.text(PLATE),
            meter_reading: fields.parse(METER_READING).unwrap_or_default(),
            ..AutomobileInfo::default()
        };
        fields.finish(car)
    }
}
