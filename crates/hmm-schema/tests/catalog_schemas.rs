//! Checks the catalog schemas shipped in `schemas/` against sample content.

use std::path::PathBuf;

use hmm_codec::Element;
use hmm_core::{FindingCode, Severity};
use hmm_schema::{audit_additional_properties, CatalogRegistry, SchemaValidator};

const NS: &str = "http://schema.hmm.com/2020";

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn registry() -> CatalogRegistry {
    CatalogRegistry::load(repo_root().join("schemas")).unwrap()
}

fn validator(catalog: &str) -> SchemaValidator {
    SchemaValidator::for_catalog(registry().get(catalog).unwrap())
}

fn envelope(body: &str) -> Element {
    Element::parse(&format!("<Note xmlns=\"{NS}\"><Content>{body}</Content></Note>")).unwrap()
}

const SUBARU: &str = "<Automobile><Maker>Subaru</Maker><Brand>Outback</Brand><Year>2017</Year>\
    <Color>Blue</Color><Pin>135</Pin><Plate>BCTT208</Plate><MeterReading>1234535</MeterReading>\
    </Automobile>";

const GAS_LOG: &str = "<GasLog><Date>2020-04-02T00:00:00.0000000</Date><Car>1</Car>\
    <Distance><Dimension><Value>300</Value><Unit>Kilometre</Unit></Dimension></Distance>\
    <CurrentMeterReading><Dimension><Value>12000</Value><Unit>Kilometre</Unit></Dimension></CurrentMeterReading>\
    <Gas><Volume><Value>40.5</Value><Unit>Litre</Unit></Volume></Gas>\
    <Price><Money><Value>58.23</Value><Code>CAD</Code></Money></Price>\
    <GasStation>Costco</GasStation>\
    <Discounts>\
    <Discount><Amount><Money><Value>0.8</Value><Code>CAD</Code></Money></Amount><Program>2</Program></Discount>\
    <Discount><Amount><Money><Value>1.2</Value><Code>CAD</Code></Money></Amount><Program>3</Program></Discount>\
    </Discounts><Comment/><CreateDate>2020-04-02T10:15:00.0000000</CreateDate></GasLog>";

#[test]
fn manifest_lists_every_subject() {
    let registry = registry();
    assert_eq!(
        registry.names(),
        vec!["Automobile", "GasDiscount", "GasLog", "HmmNote"]
    );
    assert!(registry.iter().all(|c| c.namespace == NS && c.has_schema()));
}

#[test]
fn shipped_schemas_close_every_object() {
    for catalog in registry().iter() {
        let schema: serde_json::Value = serde_json::from_str(&catalog.schema).unwrap();
        let findings = audit_additional_properties(&schema);
        assert!(
            findings.is_empty(),
            "catalog {} leaves objects open:\n{}",
            catalog.name,
            findings.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
        );
    }
}

#[test]
fn subaru_conforms() {
    assert!(validator("Automobile").validate(&envelope(SUBARU)).is_empty());
}

#[test]
fn automobile_missing_maker_is_warning_only() {
    let body = SUBARU.replace("<Maker>Subaru</Maker>", "");
    let findings = validator("Automobile").validate(&envelope(&body));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert!(findings[0].message.contains("Maker"));
}

#[test]
fn childless_automobile_warns_per_child() {
    let findings = validator("Automobile").validate(&envelope("<Automobile/>"));
    assert_eq!(findings.len(), 7);
    assert!(findings
        .iter()
        .all(|f| f.severity == Severity::Warning && f.code == FindingCode::MissingElement));
}

#[test]
fn automobile_blank_year_conforms() {
    let body = SUBARU.replace("<Year>2017</Year>", "<Year/>");
    assert!(validator("Automobile").validate(&envelope(&body)).is_empty());

    let body = SUBARU.replace("<Year>2017</Year>", "<Year>soon</Year>");
    let findings = validator("Automobile").validate(&envelope(&body));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
}

#[test]
fn automobile_extra_field_is_warning_only() {
    let body = SUBARU.replace("</Automobile>", "<Trim>Limited</Trim></Automobile>");
    let findings = validator("Automobile").validate(&envelope(&body));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(findings[0].code, FindingCode::UnexpectedElement);
}

#[test]
fn automobile_not_well_formed_is_error() {
    let findings = validator("Automobile").validate_text("Not a automobile content");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
}

#[test]
fn wrong_subject_is_error() {
    let findings = validator("Automobile").validate(&envelope(GAS_LOG));
    assert!(findings.iter().any(|f| f.severity == Severity::Error));
}

#[test]
fn gas_log_conforms_with_repeated_discounts() {
    assert!(validator("GasLog").validate(&envelope(GAS_LOG)).is_empty());
}

#[test]
fn gas_log_single_and_empty_discounts_conform() {
    let single = GAS_LOG.replace(
        "<Discount><Amount><Money><Value>1.2</Value><Code>CAD</Code></Money></Amount><Program>3</Program></Discount>",
        "",
    );
    assert!(validator("GasLog").validate(&envelope(&single)).is_empty());

    let start = GAS_LOG.find("<Discounts>").unwrap();
    let end = GAS_LOG.find("</Discounts>").unwrap() + "</Discounts>".len();
    let empty = format!("{}<Discounts/>{}", &GAS_LOG[..start], &GAS_LOG[end..]);
    assert!(validator("GasLog").validate(&envelope(&empty)).is_empty());
}

#[test]
fn discount_entry_missing_program_is_warning() {
    let body = GAS_LOG.replace("<Program>3</Program>", "");
    let findings = validator("GasLog").validate(&envelope(&body));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(findings[0].path.as_deref(), Some("/GasLog/Discounts/Discount/1"));
}

#[test]
fn childless_discount_entry_is_warning_only() {
    let body = GAS_LOG.replace(
        "<Discount><Amount><Money><Value>0.8</Value><Code>CAD</Code></Money></Amount><Program>2</Program></Discount>",
        "<Discount/>",
    );
    let findings = validator("GasLog").validate(&envelope(&body));
    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f.severity == Severity::Warning
        && f.path.as_deref() == Some("/GasLog/Discounts/Discount/0")));
}

#[test]
fn empty_price_is_missing_money() {
    let body = GAS_LOG.replace(
        "<Price><Money><Value>58.23</Value><Code>CAD</Code></Money></Price>",
        "<Price/>",
    );
    let findings = validator("GasLog").validate(&envelope(&body));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::MissingElement);
    assert_eq!(findings[0].path.as_deref(), Some("/GasLog/Price"));
}

#[test]
fn gas_discount_bad_flag_is_error() {
    let body = "<GasDiscount><Program>Costco</Program>\
        <Amount><Money><Value>0.08</Value><Code>CAD</Code></Money></Amount>\
        <DiscountType>PerUnit</DiscountType><IsActive>maybe</IsActive><Comment/></GasDiscount>";
    let findings = validator("GasDiscount").validate(&envelope(body));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
}

#[test]
fn text_note_accepts_text_and_rejects_elements() {
    let v = validator("HmmNote");
    assert!(v.validate(&envelope("call the dealer")).is_empty());
    assert!(v.validate(&envelope("")).is_empty());
    let findings = v.validate(&envelope(SUBARU));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
}
