//! # Content Validation
//!
//! Checks a note's `<Content>` element against its catalog's schema and
//! turns every violation into a [`Finding`].
//!
//! ## Projection
//!
//! The schema language is JSON Schema (draft 2020-12), evaluated over a
//! JSON view of the content tree built by [`project`]:
//!
//! ```text
//! <Content>                         {
//!   <Automobile>                      "Automobile": {
//!     <Maker>Subaru</Maker>              "Maker": "Subaru",
//!     <Year>2017</Year>                  "Year": "2017"
//!   </Automobile>                     }
//! </Content>                        }
//! ```
//!
//! Repeated child names collapse into an array, in document order. An
//! element without element children projects to its text, so an empty
//! container such as `<Discounts/>` projects to `""`.
//!
//! Where the schema expects an object and finds blank text, the element is
//! re-read as an object with no children before findings are collected.
//! `<Automobile/>` is therefore an Automobile missing every child (one
//! Warning each) rather than a shape violation.
//!
//! ## Classification
//!
//! The instance path of a `required` violation tells the two missing-element
//! cases apart: at the root it means the subject's own element is absent
//! (Error), anywhere deeper it is an absent child (Warning).
//! `additionalProperties` violations are undeclared elements (Warning, one
//! per name). Every other keyword is a shape violation (Error).

use std::fmt;

use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use serde_json::{Map, Value};
use thiserror::Error;

use hmm_codec::{Element, CONTENT};
use hmm_core::{Finding, FindingCode, NoteCatalog};

/// A schema could not be turned into a validator.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema text is not JSON.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Catalog or file name the schema belongs to.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema is JSON but not a usable schema.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Catalog or file name the schema belongs to.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// Refuses every external `$ref`.
///
/// Catalog schemas are self-contained; a reference outside the document is
/// reported as a build error instead of reaching the network.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference '{}' is not available", uri.as_str()).into())
    }
}

/// A compiled catalog schema.
pub struct CompiledSchema {
    name: String,
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile schema text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaLoadError`] if `text` is not
    /// JSON and [`SchemaValidationError::ValidatorBuildError`] if it is not
    /// a valid draft 2020-12 schema.
    pub fn compile(name: &str, text: &str) -> Result<Self, SchemaValidationError> {
        let schema: Value =
            serde_json::from_str(text).map_err(|e| SchemaValidationError::SchemaLoadError {
                schema_name: name.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(OfflineRetriever);
        let validator = opts
            .build(&schema)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            validator,
        })
    }

    /// Name the schema was compiled under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check a `<Content>` element.
    pub fn check(&self, content: &Element) -> Vec<Finding> {
        let mut instance = project(content);
        self.open_hollow_containers(&mut instance);
        let mut findings = Vec::new();
        for error in self.validator.iter_errors(&instance) {
            classify(&error, &mut findings);
        }
        tracing::debug!(
            schema = %self.name,
            findings = findings.len(),
            "content checked against schema"
        );
        findings
    }

    /// Replace blank text with `{}` wherever an object is expected.
    ///
    /// Each round opens at least one element and an opened element never
    /// closes again, so the loop ends after at most one round per element.
    fn open_hollow_containers(&self, instance: &mut Value) {
        loop {
            let hollow: Vec<String> = self
                .validator
                .iter_errors(instance)
                .filter(expects_object_on_blank)
                .map(|error| error.instance_path.to_string())
                .collect();
            let mut opened = false;
            for pointer in hollow {
                if let Some(slot) = instance.pointer_mut(&pointer) {
                    if !slot.is_object() {
                        *slot = Value::Object(Map::new());
                        opened = true;
                    }
                }
            }
            if !opened {
                break;
            }
        }
    }
}

fn expects_object_on_blank(error: &ValidationError<'_>) -> bool {
    use jsonschema::error::{TypeKind, ValidationErrorKind as Kind};
    use jsonschema::primitive_type::PrimitiveType;

    let Kind::Type { kind } = &error.kind else {
        return false;
    };
    let wants_object = match kind {
        TypeKind::Single(expected) => *expected == PrimitiveType::Object,
        TypeKind::Multiple(expected) => (*expected).into_iter().any(|t| t == PrimitiveType::Object),
    };
    wants_object && matches!(&*error.instance, Value::String(text) if text.trim().is_empty())
}

/// Validator for one catalog.
///
/// A catalog without a schema yields a validator that accepts everything.
/// A catalog whose schema cannot be compiled yields a validator that
/// reports a single Fatal finding on every call, so the failure surfaces
/// in the outcome of the operation that needed it.
#[derive(Debug)]
pub struct SchemaValidator {
    state: State,
}

#[derive(Debug)]
enum State {
    Unchecked,
    Ready(CompiledSchema),
    Unusable(String),
}

impl SchemaValidator {
    /// Validator for `catalog`.
    pub fn for_catalog(catalog: &NoteCatalog) -> Self {
        if !catalog.has_schema() {
            return Self::unchecked();
        }
        Self::from_schema(&catalog.name, &catalog.schema)
    }

    /// Validator for the given schema text. Blank text disables checking.
    pub fn from_schema(name: &str, schema: &str) -> Self {
        if schema.trim().is_empty() {
            return Self::unchecked();
        }
        let state = match CompiledSchema::compile(name, schema) {
            Ok(compiled) => State::Ready(compiled),
            Err(e) => {
                tracing::warn!(schema = %name, error = %e, "catalog schema is unusable");
                State::Unusable(e.to_string())
            }
        };
        Self { state }
    }

    /// Validator that accepts all content.
    pub fn unchecked() -> Self {
        Self {
            state: State::Unchecked,
        }
    }

    /// Returns true if content is actually checked.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Unchecked)
    }

    /// Validate a parsed envelope.
    ///
    /// The envelope root must hold a `<Content>` element; its absence is a
    /// single Error.
    pub fn validate(&self, document: &Element) -> Vec<Finding> {
        if !self.is_active() {
            return Vec::new();
        }
        match document.child(CONTENT) {
            Ok(content) => self.validate_content(content),
            Err(missing) => vec![Finding::new(FindingCode::MalformedEnvelope, missing.to_string())],
        }
    }

    /// Validate the `<Content>` element directly.
    pub fn validate_content(&self, content: &Element) -> Vec<Finding> {
        match &self.state {
            State::Unchecked => Vec::new(),
            State::Ready(compiled) => compiled.check(content),
            State::Unusable(reason) => vec![Finding::new(
                FindingCode::SchemaUnavailable,
                format!("schema cannot be used: {reason}"),
            )],
        }
    }

    /// Validate raw envelope text.
    ///
    /// Text that does not parse yields exactly one Error and no further
    /// checks.
    pub fn validate_text(&self, text: &str) -> Vec<Finding> {
        if !self.is_active() {
            return Vec::new();
        }
        match Element::parse(text) {
            Ok(document) => self.validate(&document),
            Err(e) => vec![Finding::new(FindingCode::NotWellFormed, e.to_string())],
        }
    }
}

/// Validate `document` (a parsed envelope) against `schema` text.
///
/// Empty schema text means no validation. An unusable schema yields one
/// Fatal finding.
pub fn validate(document: &Element, schema: &str) -> Vec<Finding> {
    SchemaValidator::from_schema("inline", schema).validate(document)
}

/// JSON view of an element tree used as the schema instance.
pub fn project(element: &Element) -> Value {
    if !element.has_element_children() {
        return Value::String(element.text());
    }
    let mut map = Map::new();
    for child in element.elements() {
        let value = project(child);
        match map.get_mut(child.name()) {
            None => {
                map.insert(child.name().to_string(), value);
            }
            // Projected values are never arrays, so an array here is the
            // accumulator for a repeated name.
            Some(Value::Array(items)) => items.push(value),
            Some(first) => *first = Value::Array(vec![first.take(), value]),
        }
    }
    Value::Object(map)
}

fn classify(error: &ValidationError<'_>, findings: &mut Vec<Finding>) {
    use jsonschema::error::ValidationErrorKind as Kind;

    let path = element_path(&error.instance_path.to_string());
    match &error.kind {
        Kind::Required { property } => {
            let name = property_name(property);
            if path == "/" {
                findings.push(
                    Finding::new(
                        FindingCode::StructuralViolation,
                        format!("expected element <{name}> is absent from the content"),
                    )
                    .at(path),
                );
            } else {
                findings.push(
                    Finding::new(
                        FindingCode::MissingElement,
                        format!("required element <{name}> is missing"),
                    )
                    .at(path),
                );
            }
        }
        Kind::AdditionalProperties { unexpected } => {
            for name in unexpected {
                findings.push(
                    Finding::new(
                        FindingCode::UnexpectedElement,
                        format!("element <{name}> is not declared by the schema"),
                    )
                    .at(path.clone()),
                );
            }
        }
        _ => findings.push(
            Finding::new(FindingCode::StructuralViolation, error.to_string()).at(path),
        ),
    }
}

fn property_name(property: &Value) -> String {
    match property {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

fn element_path(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmm_core::Severity;

    const NS: &str = "http://schema.hmm.com/2020";

    const CAR_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "Automobile": {
                "type": "object",
                "properties": {
                    "Maker": { "type": "string" },
                    "Brand": { "type": "string" },
                    "MeterReading": { "type": "string", "pattern": "^-?[0-9]+$" }
                },
                "required": ["Maker", "Brand"],
                "additionalProperties": false
            }
        },
        "required": ["Automobile"],
        "additionalProperties": false
    }"#;

    fn envelope(body: &str) -> Element {
        Element::parse(&format!("<Note xmlns=\"{NS}\"><Content>{body}</Content></Note>")).unwrap()
    }

    fn severities(findings: &[Finding]) -> Vec<Severity> {
        findings.iter().map(|f| f.severity).collect()
    }

    #[test]
    fn projection_shapes() {
        let content = Element::parse(
            "<Content><GasLog><Date>2020-01-01</Date><Discounts><Discount><Program>1</Program></Discount>\
             <Discount><Program>2</Program></Discount></Discounts><Comment/></GasLog></Content>",
        )
        .unwrap();
        let json = project(&content);
        assert_eq!(json["GasLog"]["Date"], "2020-01-01");
        assert_eq!(json["GasLog"]["Comment"], "");
        let discounts = json["GasLog"]["Discounts"]["Discount"].as_array().unwrap();
        assert_eq!(discounts.len(), 2);
        assert_eq!(discounts[1]["Program"], "2");
    }

    #[test]
    fn three_repeats_stay_flat() {
        let content = Element::parse("<L><I>a</I><I>b</I><I>c</I></L>").unwrap();
        assert_eq!(project(&content)["I"], serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn empty_schema_accepts_anything() {
        assert!(validate(&envelope("<Anything/>"), "").is_empty());
        assert!(validate(&envelope("<Anything/>"), "   ").is_empty());
        assert!(!SchemaValidator::from_schema("blank", "").is_active());
    }

    #[test]
    fn conforming_content_has_no_findings() {
        let doc = envelope("<Automobile><Maker>Subaru</Maker><Brand>Outback</Brand></Automobile>");
        assert!(validate(&doc, CAR_SCHEMA).is_empty());
    }

    #[test]
    fn missing_child_is_warning() {
        let doc = envelope("<Automobile><Maker>Subaru</Maker></Automobile>");
        let findings = validate(&doc, CAR_SCHEMA);
        assert_eq!(severities(&findings), vec![Severity::Warning]);
        assert_eq!(findings[0].code, FindingCode::MissingElement);
        assert_eq!(findings[0].path.as_deref(), Some("/Automobile"));
        assert!(findings[0].message.contains("Brand"));
    }

    #[test]
    fn childless_subject_is_missing_every_child() {
        let findings = validate(&envelope("<Automobile/>"), CAR_SCHEMA);
        assert_eq!(severities(&findings), vec![Severity::Warning, Severity::Warning]);
        assert!(findings.iter().all(|f| f.code == FindingCode::MissingElement));
        assert!(findings
            .iter()
            .all(|f| f.path.as_deref() == Some("/Automobile")));
    }

    #[test]
    fn text_where_children_belong_is_still_error() {
        let findings = validate(&envelope("<Automobile>Subaru</Automobile>"), CAR_SCHEMA);
        assert_eq!(severities(&findings), vec![Severity::Error]);
        assert_eq!(findings[0].code, FindingCode::StructuralViolation);
    }

    #[test]
    fn empty_content_is_error() {
        let findings = validate(&envelope(""), CAR_SCHEMA);
        assert_eq!(severities(&findings), vec![Severity::Error]);
        assert_eq!(findings[0].path.as_deref(), Some("/"));
    }

    #[test]
    fn unexpected_children_are_warnings() {
        let doc = envelope(
            "<Automobile><Maker>Subaru</Maker><Brand>Outback</Brand><Trim>Limited</Trim>\
             <Engine>H4</Engine></Automobile>",
        );
        let findings = validate(&doc, CAR_SCHEMA);
        assert_eq!(severities(&findings), vec![Severity::Warning, Severity::Warning]);
        assert!(findings.iter().all(|f| f.code == FindingCode::UnexpectedElement));
    }

    #[test]
    fn absent_subject_root_is_error() {
        let doc = envelope("<GasLog><Date>2020-01-01</Date></GasLog>");
        let findings = validate(&doc, CAR_SCHEMA);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Error && f.code == FindingCode::StructuralViolation));
    }

    #[test]
    fn bad_leaf_value_is_error() {
        let doc = envelope(
            "<Automobile><Maker>Subaru</Maker><Brand>Outback</Brand>\
             <MeterReading>lots</MeterReading></Automobile>",
        );
        let findings = validate(&doc, CAR_SCHEMA);
        assert_eq!(severities(&findings), vec![Severity::Error]);
        assert_eq!(findings[0].path.as_deref(), Some("/Automobile/MeterReading"));
    }

    #[test]
    fn unusable_schema_is_fatal() {
        let doc = envelope("<Automobile/>");
        let findings = validate(&doc, "{ not json");
        assert_eq!(severities(&findings), vec![Severity::Fatal]);
        assert_eq!(findings[0].code, FindingCode::SchemaUnavailable);

        let findings = validate(&doc, r#"{ "type": 12 }"#);
        assert_eq!(severities(&findings), vec![Severity::Fatal]);
    }

    #[test]
    fn unparsable_text_is_one_error() {
        let validator = SchemaValidator::from_schema("car", CAR_SCHEMA);
        let findings = validator.validate_text("Not a automobile content");
        assert_eq!(severities(&findings), vec![Severity::Error]);
        assert_eq!(findings[0].code, FindingCode::NotWellFormed);
    }

    #[test]
    fn document_without_content_is_error() {
        let validator = SchemaValidator::from_schema("car", CAR_SCHEMA);
        let findings = validator.validate(&Element::parse("<Note/>").unwrap());
        assert_eq!(severities(&findings), vec![Severity::Error]);
        assert_eq!(findings[0].code, FindingCode::MalformedEnvelope);
    }

    #[test]
    fn catalog_without_schema_is_unchecked() {
        let catalog = NoteCatalog::new("Automobile", NS);
        assert!(!SchemaValidator::for_catalog(&catalog).is_active());
        let catalog = catalog.with_schema(CAR_SCHEMA);
        assert!(SchemaValidator::for_catalog(&catalog).is_active());
    }
}
