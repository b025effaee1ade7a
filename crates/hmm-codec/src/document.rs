//! # Typed Document Tree
//!
//! A minimal element tree over note content: elements with a local name,
//! an optional namespace URI, attributes and ordered children (elements or
//! text). Parsing is built on `quick-xml`'s pull reader; writing produces a
//! single canonical form.
//!
//! ## Canonical Form
//!
//! - No declaration, comments or processing instructions.
//! - Elements without children are self-closing (`<Comment/>`).
//! - `xmlns` is written only where an element's namespace differs from
//!   the namespace it inherits.
//! - `<`, `>` and `&` in text are escaped; attribute values additionally
//!   escape quotes.
//!
//! ## Namespaces
//!
//! An element whose namespace is `None` inherits its parent's namespace
//! when written. Lookups match children by local name only.
//!
//! ## Whitespace
//!
//! Whitespace-only text between child elements is ignorable and dropped
//! at parse time. Text in leaf elements is kept verbatim.
//!
//! ## Depth
//!
//! Parsing refuses trees nested deeper than [`MAX_DEPTH`] elements. Every
//! pass over a tree recurses, so the bound keeps hostile content a parse
//! error instead of a stack overflow.

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use hmm_core::{DecodeError, ParseError};

/// Deepest element nesting [`Element::parse`] accepts, counting the root
/// as depth 1. Note envelopes nest about eight levels.
pub const MAX_DEPTH: usize = 64;

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A named child was not found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("<{parent}> has no <{name}> element")]
pub struct NotFound {
    /// Name of the element that was searched.
    pub parent: String,
    /// Name of the child that was not found.
    pub name: String,
}

impl From<NotFound> for DecodeError {
    fn from(nf: NotFound) -> Self {
        DecodeError::missing(nf.parent, nf.name)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// An empty element with no namespace of its own.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set this element's namespace. An empty URI means none.
    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty()).map(str::to_string);
        self
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append text. Empty text adds nothing.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text.into());
        self
    }

    /// Append a leaf child `<name>text</name>`.
    pub fn with_text_child(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(Element::new(name).with_text(text))
    }

    /// Append a child node.
    pub fn push(&mut self, node: Node) {
        match node {
            Node::Text(text) => self.push_text(text),
            element => self.children.push(element),
        }
    }

    /// Give this element and every descendant without a namespace the
    /// given one.
    pub fn adopt_namespace(&mut self, namespace: Option<&str>) {
        let Some(ns) = namespace.filter(|ns| !ns.is_empty()) else {
            return;
        };
        if self.namespace.is_none() {
            self.namespace = Some(ns.to_string());
        }
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.adopt_namespace(Some(ns));
            }
        }
    }

    /// Local name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI, if this element carries one.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attribute value by name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All children in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Consume the element, returning its child elements.
    pub fn into_elements(self) -> impl Iterator<Item = Element> {
        self.children.into_iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Returns true if any child is an element.
    pub fn has_element_children(&self) -> bool {
        self.elements().next().is_some()
    }

    /// First child element with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no child has that name.
    pub fn child(&self, name: &str) -> Result<&Element, NotFound> {
        self.find_child(name).ok_or_else(|| NotFound {
            parent: self.name.clone(),
            name: name.to_string(),
        })
    }

    /// First child element with the given name, if any.
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    /// All child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |el| el.name == name)
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Text of the named child.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no child has that name.
    pub fn child_text(&self, name: &str) -> Result<String, NotFound> {
        self.child(name).map(Element::text)
    }

    /// Text of the named child, if present.
    pub fn optional_child_text(&self, name: &str) -> Option<String> {
        self.find_child(name).map(Element::text)
    }

    /// Parse well-formed markup into its root element.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text is not well-formed: unbalanced
    /// or mismatched tags, bad entity references, undeclared prefixes,
    /// text outside the root, zero or several root elements.
    pub fn parse(text: &str) -> Result<Element, ParseError> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = offset(&reader);
            let event = reader
                .read_event()
                .map_err(|e| ParseError::new(position, e.to_string()))?;
            match event {
                Event::Start(start) => {
                    ensure_single_root(&root, &stack, position)?;
                    ensure_depth(&stack, position)?;
                    let frame = open(&start, &stack).map_err(|r| ParseError::new(position, r))?;
                    stack.push(frame);
                }
                Event::Empty(start) => {
                    ensure_single_root(&root, &stack, position)?;
                    ensure_depth(&stack, position)?;
                    let frame = open(&start, &stack).map_err(|r| ParseError::new(position, r))?;
                    close(frame.element, &mut stack, &mut root);
                }
                Event::End(_) => {
                    let frame = stack.pop().ok_or_else(|| {
                        ParseError::new(position, "closing tag without an open element")
                    })?;
                    close(frame.element, &mut stack, &mut root);
                }
                Event::Text(raw) => {
                    let text = raw
                        .unescape()
                        .map_err(|e| ParseError::new(position, e.to_string()))?;
                    append_text(&mut stack, &text, position)?;
                }
                Event::CData(raw) => {
                    let bytes = raw.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| ParseError::new(position, e.to_string()))?;
                    append_text(&mut stack, text, position)?;
                }
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::new(
                offset(&reader),
                format!("element <{}> is never closed", open.element.name),
            ));
        }
        root.ok_or_else(|| ParseError::new(offset(&reader), "no root element"))
    }

    /// Write the canonical markup for this element.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_element(self, None, &mut out);
        out
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_xml())
    }
}

/// An element being parsed plus the prefixes it declares.
struct Frame {
    element: Element,
    bindings: Vec<(String, String)>,
}

fn offset(reader: &Reader<&[u8]>) -> u64 {
    u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX)
}

fn ensure_single_root(
    root: &Option<Element>,
    stack: &[Frame],
    position: u64,
) -> Result<(), ParseError> {
    if root.is_some() && stack.is_empty() {
        return Err(ParseError::new(position, "content has more than one root element"));
    }
    Ok(())
}

fn ensure_depth(stack: &[Frame], position: u64) -> Result<(), ParseError> {
    if stack.len() >= MAX_DEPTH {
        return Err(ParseError::new(
            position,
            format!("elements nest deeper than {MAX_DEPTH} levels"),
        ));
    }
    Ok(())
}

fn open(start: &BytesStart<'_>, stack: &[Frame]) -> Result<Frame, String> {
    let qname = start.name();
    let raw_name = std::str::from_utf8(qname.as_ref()).map_err(|e| e.to_string())?;
    let (prefix, local) = match raw_name.split_once(':') {
        Some((p, l)) => (p, l),
        None => ("", raw_name),
    };

    let mut bindings = Vec::new();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| e.to_string())?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        if key == "xmlns" {
            bindings.push((String::new(), value));
        } else if let Some(p) = key.strip_prefix("xmlns:") {
            bindings.push((p.to_string(), value));
        } else {
            attributes.push((key, value));
        }
    }

    let resolved = bindings
        .iter()
        .rev()
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.clone())
        .or_else(|| resolve(stack, prefix));
    if !prefix.is_empty() && resolved.is_none() {
        return Err(format!("undeclared namespace prefix '{prefix}' on <{raw_name}>"));
    }

    Ok(Frame {
        element: Element {
            name: local.to_string(),
            namespace: resolved.filter(|uri| !uri.is_empty()),
            attributes,
            children: Vec::new(),
        },
        bindings,
    })
}

fn resolve(stack: &[Frame], prefix: &str) -> Option<String> {
    stack
        .iter()
        .rev()
        .flat_map(|frame| frame.bindings.iter().rev())
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.clone())
}

fn close(mut element: Element, stack: &mut [Frame], root: &mut Option<Element>) {
    if element.has_element_children() {
        element
            .children
            .retain(|n| !matches!(n, Node::Text(t) if t.trim().is_empty()));
    }
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [Frame], text: &str, position: u64) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.element.push_text(text.to_string());
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::new(position, "text outside the root element")),
    }
}

fn write_element(el: &Element, inherited: Option<&str>, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);

    let own = el.namespace.as_deref();
    if let Some(ns) = own {
        if own != inherited {
            out.push_str(" xmlns=\"");
            out.push_str(&escape(ns));
            out.push('"');
        }
    }
    for (key, value) in &el.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    let effective = own.or(inherited);
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
            Node::Element(c) => write_element(c, effective, out),
        }
    }

    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}
