//! Plain-text notes. `<Content>` holds the note body as text and there is
//! no subject element; the note's own subject line is kept on the note.

use hmm_codec::{ContentBody, Element, CONTENT};
use hmm_core::{subject, Finding, FindingCode, Note, Outcome, TextNote};

use crate::entity::EntitySerializer;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextNoteSerializer;

impl EntitySerializer for TextNoteSerializer {
    type Entity = TextNote;

    fn subject(&self) -> &'static str {
        subject::TEXT_NOTE
    }

    /// The `<Content>` element itself, holding the body text.
    fn to_fragment(&self, note: &TextNote, namespace: Option<&str>) -> Element {
        Element::new(CONTENT)
            .with_namespace(namespace)
            .with_text(note.body.clone())
    }

    fn from_fragment(&self, fragment: &Element, outcome: &mut Outcome) -> Option<TextNote> {
        if let Some(child) = fragment.elements().next() {
            outcome.record(
                Finding::new(
                    FindingCode::StructuralViolation,
                    format!("text note content holds element <{}>", child.name()),
                )
                .at("/"),
            );
            return None;
        }
        Some(TextNote {
            body: fragment.text(),
            ..TextNote::default()
        })
    }

    fn to_body(&self, note: &TextNote, _namespace: Option<&str>) -> ContentBody {
        ContentBody::Text(note.body.clone())
    }

    fn from_body(&self, body: &ContentBody, outcome: &mut Outcome) -> Option<TextNote> {
        match body {
            ContentBody::Text(text) => Some(TextNote {
                body: text.clone(),
                ..TextNote::default()
            }),
            ContentBody::Element(fragment) => {
                outcome.record(
                    Finding::new(
                        FindingCode::StructuralViolation,
                        format!("text note content holds element <{}>", fragment.name()),
                    )
                    .at("/"),
                );
                None
            }
        }
    }

    fn note_subject(&self, note: &TextNote) -> String {
        if note.subject.trim().is_empty() {
            subject::TEXT_NOTE.to_string()
        } else {
            note.subject.clone()
        }
    }

    fn attach(&self, entity: &mut TextNote, note: &Note) {
        entity.id = note.id;
        entity.author_id = note.author_id;
        entity.subject = note.subject.clone();
    }
}
