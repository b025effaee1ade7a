//! # Entity Serializer Trait
//!
//! One implementation per entity kind. An implementation only knows how
//! to turn its entity into a fragment and back; wrapping, validation and
//! identity are handled once for all kinds by
//! [`NoteSerializer`](crate::pipeline::NoteSerializer).

use hmm_codec::{ContentBody, Element};
use hmm_core::{Finding, FindingCode, HmmEntity, Note, Outcome};

/// Converts one entity kind to and from its content fragment.
pub trait EntitySerializer {
    /// The entity this serializer handles.
    type Entity: HmmEntity;

    /// Subject name: the root element of the fragment.
    fn subject(&self) -> &'static str;

    /// Build the fragment for `entity` in the given namespace.
    fn to_fragment(&self, entity: &Self::Entity, namespace: Option<&str>) -> Element;

    /// Read an entity from its fragment.
    ///
    /// Unknown children are ignored and absent ones read as defaults.
    /// Values that are present but unparsable, or references that cannot
    /// be resolved, are recorded in `outcome`; `None` means no entity could
    /// be produced.
    fn from_fragment(&self, fragment: &Element, outcome: &mut Outcome) -> Option<Self::Entity>;

    /// What `<Content>` holds for `entity`.
    fn to_body(&self, entity: &Self::Entity, namespace: Option<&str>) -> ContentBody {
        ContentBody::Element(self.to_fragment(entity, namespace))
    }

    /// Read an entity from the envelope body, checking the subject first.
    fn from_body(&self, body: &ContentBody, outcome: &mut Outcome) -> Option<Self::Entity> {
        match body {
            ContentBody::Element(fragment) if fragment.name() == self.subject() => {
                self.from_fragment(fragment, outcome)
            }
            ContentBody::Element(fragment) => {
                outcome.record(
                    Finding::new(
                        FindingCode::StructuralViolation,
                        format!(
                            "content holds <{}>, expected <{}>",
                            fragment.name(),
                            self.subject()
                        ),
                    )
                    .at("/"),
                );
                None
            }
            ContentBody::Text(_) => {
                outcome.record(
                    Finding::new(
                        FindingCode::StructuralViolation,
                        format!("content holds text, expected <{}>", self.subject()),
                    )
                    .at("/"),
                );
                None
            }
        }
    }

    /// Subject recorded on the note that stores `entity`.
    fn note_subject(&self, _entity: &Self::Entity) -> String {
        self.subject().to_string()
    }

    /// Copy what the note knows about the entity onto it after extraction.
    fn attach(&self, entity: &mut Self::Entity, note: &Note) {
        entity.assign_identity(note.id, note.author_id);
    }
}
