//! # Note Envelope
//!
//! The fixed outer shape shared by every note's content:
//!
//! ```text
//! <Note xmlns="{namespace}">
//!   <Content>{one fragment element, or plain text}</Content>
//! </Note>
//! ```
//!
//! ## No Double Wrapping
//!
//! Callers sometimes hand back content they previously unwrapped and then
//! re-wrapped, i.e. a full envelope where a fragment is expected. Wrapping
//! detects that (for both element and text bodies) and uses the inner body,
//! so re-serializing an envelope yields the same canonical envelope rather
//! than an envelope inside an envelope.

use thiserror::Error;

use hmm_core::ParseError;

use crate::document::Element;

/// Root element name of every envelope.
pub const ROOT: &str = "Note";

/// Name of the single child of the root that holds the body.
pub const CONTENT: &str = "Content";

/// Content text parsed, but is not an envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Content is not well-formed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Root element is not `<Note>`.
    #[error("root element is <{0}>, expected <Note>")]
    UnexpectedRoot(String),

    /// Root does not hold exactly one `<Content>` element.
    #[error("<Note> holds {0} <Content> elements, expected exactly one")]
    ContentCount(usize),

    /// Root holds elements other than `<Content>`.
    #[error("<Note> holds unexpected element <{0}>")]
    UnexpectedElement(String),

    /// `<Content>` holds more than one element.
    #[error("<Content> holds {0} elements, expected at most one")]
    AmbiguousBody(usize),
}

/// What `<Content>` holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBody {
    /// An entity fragment, e.g. `<Automobile>…</Automobile>`.
    Element(Element),
    /// Plain text, for generic notes.
    Text(String),
}

impl ContentBody {
    /// The fragment, if the body is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ContentBody::Element(el) => Some(el),
            ContentBody::Text(_) => None,
        }
    }
}

/// A parsed or freshly built envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    namespace: Option<String>,
    body: ContentBody,
}

impl Envelope {
    /// Wrap a body in the given namespace, unwrapping any envelope the
    /// body already is.
    pub fn new(body: ContentBody, namespace: &str) -> Self {
        let mut body = body;
        loop {
            let inner = match &body {
                ContentBody::Element(el) if el.name() == ROOT => body_of(el).ok(),
                ContentBody::Text(text) if text.trim_start().starts_with('<') => {
                    Envelope::parse(text).ok().map(|env| env.body)
                }
                _ => None,
            };
            match inner {
                Some(inner) => {
                    tracing::debug!("body is already an envelope, using its content");
                    body = inner;
                }
                None => break,
            }
        }

        let namespace = Some(namespace).filter(|ns| !ns.is_empty());
        if let ContentBody::Element(el) = &mut body {
            el.adopt_namespace(namespace);
        }
        Self {
            namespace: namespace.map(str::to_string),
            body,
        }
    }

    /// Wrap an entity fragment.
    pub fn wrap(fragment: Element, namespace: &str) -> Self {
        Self::new(ContentBody::Element(fragment), namespace)
    }

    /// Wrap plain text.
    pub fn wrap_text(text: impl Into<String>, namespace: &str) -> Self {
        Self::new(ContentBody::Text(text.into()), namespace)
    }

    /// Parse envelope text.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Parse`] if the text is not well-formed and
    /// the other variants if it is well-formed but not an envelope.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        Self::from_root(&Element::parse(text)?)
    }

    /// Interpret an already parsed root element as an envelope.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvelopeError`] describing the first shape violation.
    pub fn from_root(root: &Element) -> Result<Self, EnvelopeError> {
        Ok(Self {
            namespace: root.namespace().map(str::to_string),
            body: body_of(root)?,
        })
    }

    /// Namespace URI of the root, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The body.
    pub fn body(&self) -> &ContentBody {
        &self.body
    }

    /// Consume the envelope, returning its body.
    pub fn into_body(self) -> ContentBody {
        self.body
    }

    /// The entity fragment, if the body is an element.
    pub fn fragment(&self) -> Option<&Element> {
        self.body.as_element()
    }

    /// The `<Content>` element with its body.
    pub fn content_element(&self) -> Element {
        let content = Element::new(CONTENT).with_namespace(self.namespace());
        match &self.body {
            ContentBody::Element(el) => content.with_child(el.clone()),
            ContentBody::Text(text) => content.with_text(text.clone()),
        }
    }

    /// The whole envelope as an element tree.
    pub fn to_element(&self) -> Element {
        Element::new(ROOT)
            .with_namespace(self.namespace())
            .with_child(self.content_element())
    }

    /// Canonical envelope text.
    pub fn to_xml(&self) -> String {
        self.to_element().to_xml()
    }
}

/// Returns true if `root` has the envelope shape.
pub fn is_envelope(root: &Element) -> bool {
    body_of(root).is_ok()
}

/// Wrap a fragment and write the envelope text.
pub fn wrap(fragment: Element, namespace: &str) -> String {
    Envelope::wrap(fragment, namespace).to_xml()
}

/// Parse envelope text into its root element and namespace.
///
/// Only well-formedness is checked here; shape checks belong to
/// [`Envelope::from_root`].
///
/// # Errors
///
/// Returns [`ParseError`] if the text is not well-formed.
pub fn unwrap(text: &str) -> Result<(Element, Option<String>), ParseError> {
    let root = Element::parse(text)?;
    let namespace = root.namespace().map(str::to_string);
    Ok((root, namespace))
}

fn body_of(root: &Element) -> Result<ContentBody, EnvelopeError> {
    if root.name() != ROOT {
        return Err(EnvelopeError::UnexpectedRoot(root.name().to_string()));
    }
    if let Some(other) = root.elements().find(|el| el.name() != CONTENT) {
        return Err(EnvelopeError::UnexpectedElement(other.name().to_string()));
    }
    let contents: Vec<&Element> = root.children_named(CONTENT).collect();
    let [content] = contents.as_slice() else {
        return Err(EnvelopeError::ContentCount(contents.len()));
    };

    let mut elements = content.elements();
    match (elements.next(), elements.next()) {
        (None, _) => Ok(ContentBody::Text(content.text())),
        (Some(fragment), None) => Ok(ContentBody::Element(fragment.clone())),
        (Some(_), Some(_)) => Err(EnvelopeError::AmbiguousBody(content.elements().count())),
    }
}
