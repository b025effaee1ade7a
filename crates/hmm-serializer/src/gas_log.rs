//! # Gas Log Serializer
//!
//! ```text
//! <GasLog>
//!   <Date>2020-04-02T00:00:00.0000000</Date>
//!   <Car>1</Car>
//!   <Distance><Dimension>…</Dimension></Distance>
//!   <CurrentMeterReading><Dimension>…</Dimension></CurrentMeterReading>
//!   <Gas><Volume>…</Volume></Gas>
//!   <Price><Money>…</Money></Price>
//!   <GasStation>Costco</GasStation>
//!   <Discounts>
//!     <Discount><Amount><Money>…</Money></Amount><Program>2</Program></Discount>
//!   </Discounts>
//!   <Comment/>
//!   <CreateDate>2020-04-02T10:15:00.0000000</CreateDate>
//! </GasLog>
//! ```
//!
//! ## References
//!
//! The car and each discount program are stored by id only and resolved
//! through the injected lookups on extraction, one call at a time: the car
//! first, then discounts in document order.
//!
//! - Car absent, unparsable or not found: Error, no log.
//! - Discount entry malformed or its program not found: Error for that
//!   entry, which is skipped; the log is still produced.
//! - A lookup that fails outright: Fatal. A failed car lookup ends
//!   extraction; a failed discount lookup ends discount resolution.

use hmm_codec::{decode_field, encode_field, Element};
use hmm_core::{
    subject, AutomobileInfo, Dimension, Finding, FindingCode, GasDiscountInfo, GasLog, Money,
    Outcome, Volume,
};

use crate::entity::EntitySerializer;
use crate::fields::Fields;
use crate::lookup::{AutomobileLookup, DiscountLookup};

const DATE: &str = "Date";
const CAR: &str = "Car";
const DISTANCE: &str = "Distance";
const CURRENT_METER_READING: &str = "CurrentMeterReading";
const GAS: &str = "Gas";
const PRICE: &str = "Price";
const GAS_STATION: &str = "GasStation";
const DISCOUNTS: &str = "Discounts";
const DISCOUNT: &str = "Discount";
const AMOUNT: &str = "Amount";
const PROGRAM: &str = "Program";
const COMMENT: &str = "Comment";
const CREATE_DATE: &str = "CreateDate";

/// Gas log serializer with its reference lookups.
#[derive(Debug, Clone)]
pub struct GasLogSerializer<A, D> {
    cars: A,
    discounts: D,
}

impl<A, D> GasLogSerializer<A, D>
where
    A: AutomobileLookup,
    D: DiscountLookup,
{
    pub fn new(cars: A, discounts: D) -> Self {
        Self { cars, discounts }
    }

    fn resolve_car(&self, fields: &mut Fields<'_>) -> Option<AutomobileInfo> {
        let path = fields.path(CAR);
        let id_text = fields.text(CAR);
        if id_text.trim().is_empty() {
            fields.outcome().record(
                Finding::new(FindingCode::UnresolvedReference, "gas log names no car").at(path),
            );
            return None;
        }
        let id: i64 = fields.parse(CAR)?;

        match self.cars.get_by_id(id) {
            Ok(Some(car)) => Some(car),
            Ok(None) => {
                fields.outcome().record(
                    Finding::new(
                        FindingCode::UnresolvedReference,
                        format!("automobile {id} does not exist"),
                    )
                    .at(path),
                );
                None
            }
            Err(e) => {
                tracing::warn!(car = id, error = %e, "automobile lookup failed");
                fields.outcome().record(
                    Finding::new(
                        FindingCode::LookupFailed,
                        format!("automobile {id} could not be looked up: {e}"),
                    )
                    .at(path),
                );
                None
            }
        }
    }

    fn resolve_discounts(&self, fragment: &Element, outcome: &mut Outcome) -> Vec<GasDiscountInfo> {
        let Some(holder) = fragment.find_child(DISCOUNTS) else {
            return Vec::new();
        };
        let mut resolved = Vec::new();
        for (index, entry) in holder.children_named(DISCOUNT).enumerate() {
            let path = format!("/{}/{DISCOUNTS}/{DISCOUNT}/{index}", fragment.name());

            let amount = match decode_field::<Money>(entry, AMOUNT) {
                Ok(amount) => amount,
                Err(e) => {
                    outcome.record(
                        Finding::new(
                            FindingCode::InvalidValue,
                            format!("discount entry skipped: {e}"),
                        )
                        .at(path),
                    );
                    continue;
                }
            };
            let program_text = entry.optional_child_text(PROGRAM).unwrap_or_default();
            let Ok(id) = program_text.trim().parse::<i64>() else {
                outcome.record(
                    Finding::new(
                        FindingCode::InvalidValue,
                        format!(
                            "discount entry skipped: program id \"{}\" is not a number",
                            program_text.trim()
                        ),
                    )
                    .at(path),
                );
                continue;
            };

            match self.discounts.get_by_id(id) {
                Ok(Some(program)) => resolved.push(GasDiscountInfo { amount, program }),
                Ok(None) => outcome.record(
                    Finding::new(
                        FindingCode::UnresolvedReference,
                        format!("discount entry skipped: discount program {id} does not exist"),
                    )
                    .at(path),
                ),
                Err(e) => {
                    tracing::warn!(program = id, error = %e, "discount lookup failed");
                    outcome.record(
                        Finding::new(
                            FindingCode::LookupFailed,
                            format!("discount program {id} could not be looked up: {e}"),
                        )
                        .at(path),
                    );
                    break;
                }
            }
        }
        resolved
    }
}

impl<A, D> EntitySerializer for GasLogSerializer<A, D>
where
    A: AutomobileLookup,
    D: DiscountLookup,
{
    type Entity = GasLog;

    fn subject(&self) -> &'static str {
        subject::GAS_LOG
    }

    fn to_fragment(&self, log: &GasLog, namespace: Option<&str>) -> Element {
        let mut discounts = Element::new(DISCOUNTS);
        for info in &log.discounts {
            discounts = discounts.with_child(
                Element::new(DISCOUNT)
                    .with_child(encode_field(AMOUNT, &info.amount, namespace))
                    .with_text_child(PROGRAM, info.program.id.value().to_string()),
            );
        }

        let mut fragment = Element::new(subject::GAS_LOG)
            .with_text_child(DATE, log.date.to_round_trip())
            .with_text_child(CAR, log.car.id.value().to_string())
            .with_child(encode_field(DISTANCE, &log.distance, namespace))
            .with_child(encode_field(
                CURRENT_METER_READING,
                &log.current_meter_reading,
                namespace,
            ))
            .with_child(encode_field(GAS, &log.gas, namespace))
            .with_child(encode_field(PRICE, &log.price, namespace))
            .with_text_child(GAS_STATION, &log.station)
            .with_child(discounts)
            .with_text_child(COMMENT, &log.comment)
            .with_text_child(CREATE_DATE, log.create_date.to_round_trip());
        fragment.adopt_namespace(namespace);
        fragment
    }

    fn from_fragment(&self, fragment: &Element, outcome: &mut Outcome) -> Option<GasLog> {
        let mut fields = Fields::new(fragment, outcome);
        let log = GasLog {
            date: fields.date(DATE),
            distance: fields.value::<Dimension>(DISTANCE).unwrap_or_default(),
            current_meter_reading: fields
                .value::<Dimension>(CURRENT_METER_READING)
                .unwrap_or_default(),
            gas: fields.value::<Volume>(GAS).unwrap_or_default(),
            price: fields.value::<Money>(PRICE).unwrap_or_default(),
            station: fields.text(GAS_STATION),
            comment: fields.text(COMMENT),
            create_date: fields.date(CREATE_DATE),
            ..GasLog::default()
        };
        let car = self.resolve_car(&mut fields);
        let mut log = fields.finish(log)?;
        log.car = car?;
        log.discounts = self.resolve_discounts(fragment, outcome);
        Some(log)
    }
}
