//! # Note Pipeline
//!
//! Shared serialize/deserialize flow for every entity kind.
//!
//! ## Serialize
//!
//! ```text
//! entity ─→ to_body ─→ Envelope::new ─→ validate own output ─→ Note
//! ```
//!
//! A missing entity produces no note and a Warning. Output that fails its
//! own catalog schema at Error or above is withheld.
//!
//! ## Deserialize
//!
//! ```text
//! NotStarted ──parse──→ Parsed ──validate──→ Validated ──extract──→ Extracted
//!      │                   │                                  │
//!      └────────────────── ┴──────────────→ Rejected ←────────┘
//! ```
//!
//! Rejected on unparsable content or a malformed envelope, on a schema
//! finding at Error or above, or when extraction yields no entity. An
//! extracted entity is returned even if extraction recorded Errors (an
//! unresolvable discount entry, say); callers check `success()`.

use hmm_codec::{Element, Envelope};
use hmm_core::{Finding, FindingCode, HmmEntity, Note, NoteCatalog, Outcome, Reported};
use hmm_schema::SchemaValidator;

use crate::entity::EntitySerializer;

/// How far a deserialize call got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    NotStarted,
    /// Content parsed into an envelope.
    Parsed,
    /// Content passed schema validation.
    Validated,
    /// An entity was produced.
    Extracted,
    /// The call ended without an entity.
    Rejected,
}

impl Stage {
    /// Returns true for `Extracted` and `Rejected`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Extracted | Stage::Rejected)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::NotStarted => "not-started",
            Stage::Parsed => "parsed",
            Stage::Validated => "validated",
            Stage::Extracted => "extracted",
            Stage::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Result of a deserialize call.
#[derive(Debug, Clone)]
pub struct Deserialized<T> {
    pub value: Option<T>,
    pub outcome: Outcome,
    /// Terminal stage reached.
    pub stage: Stage,
}

impl<T> Deserialized<T> {
    /// True iff the outcome recorded nothing blocking.
    pub fn success(&self) -> bool {
        self.outcome.success()
    }

    /// Drop the stage.
    pub fn into_reported(self) -> Reported<T> {
        Reported::new(self.value, self.outcome)
    }
}

/// Serializes one entity kind to and from notes of one catalog.
#[derive(Debug)]
pub struct NoteSerializer<S> {
    serializer: S,
    catalog: NoteCatalog,
    validator: SchemaValidator,
}

impl<S: EntitySerializer> NoteSerializer<S> {
    /// Pipeline for `catalog`. Its schema is compiled once here; an
    /// unusable schema surfaces as a Fatal finding on every call.
    pub fn new(serializer: S, catalog: NoteCatalog) -> Self {
        let validator = SchemaValidator::for_catalog(&catalog);
        Self {
            serializer,
            catalog,
            validator,
        }
    }

    pub fn catalog(&self) -> &NoteCatalog {
        &self.catalog
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    fn namespace(&self) -> Option<&str> {
        Some(self.catalog.namespace.as_str()).filter(|ns| !ns.is_empty())
    }

    /// Serialize `entity` into a note of this catalog.
    ///
    /// The note carries the entity's id and author; a new entity yields
    /// an unsaved note.
    pub fn serialize(&self, entity: Option<&S::Entity>) -> Reported<Note> {
        let mut outcome = Outcome::new();
        let subject = self.serializer.subject();

        let Some(entity) = entity else {
            outcome.report(
                FindingCode::NullEntity,
                format!("null {subject} entity, nothing to serialize"),
            );
            return Reported::rejected(outcome);
        };

        let body = self.serializer.to_body(entity, self.namespace());
        let envelope = Envelope::new(body, &self.catalog.namespace);
        outcome.extend(self.validator.validate_content(&envelope.content_element()));
        if outcome.has_error() {
            tracing::warn!(
                subject,
                catalog = %self.catalog.name,
                findings = outcome.len(),
                "serialized content fails its schema; note withheld"
            );
            return Reported::rejected(outcome);
        }

        let note = Note::draft(
            self.serializer.note_subject(entity),
            envelope.to_xml(),
            self.catalog.name.clone(),
            entity.author_id(),
        )
        .with_id(entity.id());
        tracing::debug!(subject, note = %note.id, "entity serialized");
        Reported::new(Some(note), outcome)
    }

    /// Read the entity held by `note`.
    pub fn deserialize(&self, note: &Note) -> Deserialized<S::Entity> {
        let mut outcome = Outcome::new();
        let subject = self.serializer.subject();
        let mut stage = Stage::NotStarted;
        tracing::debug!(subject, note = %note.id, %stage, "deserializing note");

        let root = match Element::parse(&note.content) {
            Ok(root) => root,
            Err(e) => {
                outcome.record(Finding::new(FindingCode::NotWellFormed, e.to_string()));
                return self.reject(note, outcome, stage);
            }
        };
        let envelope = match Envelope::from_root(&root) {
            Ok(envelope) => envelope,
            Err(e) => {
                outcome.record(Finding::new(FindingCode::MalformedEnvelope, e.to_string()));
                return self.reject(note, outcome, stage);
            }
        };
        stage = Stage::Parsed;
        tracing::debug!(subject, note = %note.id, %stage);

        if envelope.namespace() != self.namespace() {
            outcome.report(
                FindingCode::NamespaceMismatch,
                format!(
                    "content namespace {} differs from catalog namespace {}",
                    describe(envelope.namespace()),
                    describe(self.namespace())
                ),
            );
        }

        outcome.extend(self.validator.validate(&root));
        if outcome.has_error() {
            return self.reject(note, outcome, stage);
        }
        stage = Stage::Validated;
        tracing::debug!(subject, note = %note.id, %stage);

        match self.serializer.from_body(envelope.body(), &mut outcome) {
            Some(mut entity) => {
                self.serializer.attach(&mut entity, note);
                stage = Stage::Extracted;
                tracing::debug!(subject, note = %note.id, %stage, findings = outcome.len());
                Deserialized {
                    value: Some(entity),
                    outcome,
                    stage,
                }
            }
            None => self.reject(note, outcome, stage),
        }
    }

    fn reject(&self, note: &Note, outcome: Outcome, reached: Stage) -> Deserialized<S::Entity> {
        tracing::warn!(
            subject = self.serializer.subject(),
            note = %note.id,
            reached = %reached,
            findings = outcome.len(),
            "note content rejected"
        );
        Deserialized {
            value: None,
            outcome,
            stage: Stage::Rejected,
        }
    }
}

fn describe(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("'{ns}'"),
        None => "(none)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmm_core::{AuthorId, AutomobileInfo, NoteId, Severity, Verdict};

    use crate::automobile::AutomobileSerializer;

    const NS: &str = "http://schema.hmm.com/2020";

    fn pipeline() -> NoteSerializer<AutomobileSerializer> {
        NoteSerializer::new(AutomobileSerializer, NoteCatalog::new("Automobile", NS))
    }

    fn note(content: &str) -> Note {
        Note::draft("Automobile", content, "Automobile", AuthorId(7)).with_id(NoteId(42))
    }

    #[test]
    fn null_entity_gives_no_note() {
        let reported = pipeline().serialize(None);
        assert!(reported.value.is_none());
        assert!(!reported.outcome.is_empty());
        assert_eq!(reported.outcome.verdict(), Verdict::Warning);
        assert!(reported.outcome.has_code(FindingCode::NullEntity));
    }

    #[test]
    fn identity_travels_with_the_note() {
        let car = AutomobileInfo {
            id: NoteId(9),
            author_id: AuthorId(3),
            maker: "Subaru".into(),
            ..AutomobileInfo::default()
        };
        let note = pipeline().serialize(Some(&car)).value.unwrap();
        assert_eq!(note.id, NoteId(9));
        assert_eq!(note.author_id, AuthorId(3));
        assert_eq!(note.catalog, "Automobile");
        assert_eq!(note.subject, "Automobile");

        let back = pipeline().deserialize(&note.with_id(NoteId(10)));
        let back = back.value.unwrap();
        assert_eq!(back.id, NoteId(10));
        assert_eq!(back.author_id, AuthorId(3));
    }

    #[test]
    fn stages() {
        let out = pipeline().deserialize(&note("Not a automobile content"));
        assert_eq!(out.stage, Stage::Rejected);
        assert_eq!(out.outcome.len(), 1);
        assert_eq!(out.outcome.findings()[0].severity, Severity::Error);

        let out = pipeline().deserialize(&note("<Automobile/>"));
        assert_eq!(out.stage, Stage::Rejected);
        assert!(out.outcome.has_code(FindingCode::MalformedEnvelope));

        let out = pipeline().deserialize(&note(&format!(
            "<Note xmlns=\"{NS}\"><Content><GasLog/></Content></Note>"
        )));
        assert_eq!(out.stage, Stage::Rejected);
        assert!(out.outcome.has_code(FindingCode::StructuralViolation));

        let out = pipeline().deserialize(&note(&format!(
            "<Note xmlns=\"{NS}\"><Content><Automobile><Maker>Subaru</Maker></Automobile></Content></Note>"
        )));
        assert_eq!(out.stage, Stage::Extracted);
        assert!(out.stage.is_terminal());
        assert!(out.success());
    }

    #[test]
    fn foreign_namespace_is_warning() {
        let out = pipeline().deserialize(&note(
            "<Note xmlns=\"urn:other\"><Content><Automobile/></Content></Note>",
        ));
        assert_eq!(out.stage, Stage::Extracted);
        assert_eq!(out.outcome.verdict(), Verdict::Warning);
        assert!(out.outcome.has_code(FindingCode::NamespaceMismatch));
    }

    #[test]
    fn broken_schema_is_fatal_both_ways() {
        let catalog = NoteCatalog::new("Automobile", NS).with_schema("{ not json");
        let pipeline = NoteSerializer::new(AutomobileSerializer, catalog);

        let reported = pipeline.serialize(Some(&AutomobileInfo::default()));
        assert!(reported.value.is_none());
        assert!(reported.outcome.has_fatal());

        let text = format!("<Note xmlns=\"{NS}\"><Content><Automobile/></Content></Note>");
        let out = pipeline.deserialize(&note(&text));
        assert_eq!(out.stage, Stage::Rejected);
        assert!(out.outcome.has_code(FindingCode::SchemaUnavailable));
    }
}
