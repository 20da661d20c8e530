//! Document tree builder and serializer.
//!
//! The tree is the durable, interchange form of a diagram: a single root,
//! ordered children, string attributes. Every parse builds a fresh tree from
//! an in-memory buffer through its own reader; nothing is pooled or shared
//! between calls, so concurrent conversions cannot observe each other.

use crate::error::{ProfileError, Result};
use crate::grammar::DocumentGrammar;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Encoding declared on every serialized document.
pub const DOCUMENT_ENCODING: &str = "UTF-8";

// ── Element ──

/// One node of the document tree. Child order is semantically significant
/// and preserved exactly; attribute presence survives every conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified name as written in the source, prefix included.
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Local part of the qualified name.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }
}

// ── DocumentTree ──

/// A parsed document: exactly one root element. Built fresh per conversion
/// call and owned exclusively by it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    pub root: Element,
}

impl DocumentTree {
    /// Parse serialized text into a tree.
    ///
    /// The text is consumed as an in-memory UTF-8 byte stream; no ambient
    /// file-system state is touched. Tokenizer failures and unbalanced trees
    /// are `MalformedDocument`; a missing root, a second root, or a root
    /// whose local name is not the grammar's `root_element` are
    /// `SchemaViolation` / `MalformedDocument` per the cause.
    pub fn parse(text: &str, grammar: &DocumentGrammar) -> Result<Self> {
        let mut reader = Reader::from_reader(text.as_bytes());
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = element_from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        ProfileError::MalformedDocument("unbalanced end tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(t)) => {
                    let value = t
                        .unescape()
                        .map_err(|e| ProfileError::MalformedDocument(e.to_string()))?;
                    if !value.is_empty() {
                        append_text(&mut stack, &value)?;
                    }
                }
                Ok(Event::CData(t)) => {
                    let raw = t.into_inner();
                    let value = String::from_utf8_lossy(&raw);
                    append_text(&mut stack, &value)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // declaration, comments, processing instructions
                Err(e) => return Err(ProfileError::MalformedDocument(e.to_string())),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(ProfileError::MalformedDocument(format!(
                "{} unclosed element(s)",
                stack.len()
            )));
        }
        let root = root.ok_or_else(|| {
            ProfileError::SchemaViolation("document has no root element".to_string())
        })?;
        if root.local_name() != grammar.root_element {
            return Err(ProfileError::SchemaViolation(format!(
                "expected root <{}>, found <{}>",
                grammar.root_element, root.name
            )));
        }
        Ok(Self { root })
    }

    /// Serialize the tree to compact text with an explicit UTF-8
    /// declaration. Deterministic: the same tree always yields the same
    /// bytes.
    ///
    /// The grammar's namespace is declared on the root unless the tree
    /// already carries an `xmlns` attribute there.
    pub fn to_xml(&self, grammar: &DocumentGrammar) -> Result<String> {
        let mut xml = String::new();
        let namespace = match (&grammar.default_namespace, self.root.attribute("xmlns")) {
            (Some(ns), None) => Some(ns.as_str()),
            _ => None,
        };
        write!(xml, r#"<?xml version="1.0" encoding="{DOCUMENT_ENCODING}"?>"#)
            .and_then(|_| write_element(&mut xml, &self.root, namespace))
            .map_err(|e| {
                ProfileError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
        Ok(xml)
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ProfileError::MalformedDocument(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ProfileError::MalformedDocument(e.to_string()))?
            .into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

/// Hand a completed element to its parent, or to the root slot when the
/// stack is empty.
fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(ProfileError::MalformedDocument(
            "more than one root element".to_string(),
        )),
    }
}

fn append_text(stack: &mut [Element], value: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            match &mut parent.text {
                Some(existing) => existing.push_str(value),
                None => parent.text = Some(value.to_string()),
            }
            Ok(())
        }
        None => Err(ProfileError::MalformedDocument(
            "text content outside the root element".to_string(),
        )),
    }
}

fn write_element(out: &mut String, element: &Element, namespace: Option<&str>) -> std::fmt::Result {
    write!(out, "<{}", element.name)?;
    if let Some(ns) = namespace {
        write!(out, r#" xmlns="{}""#, xml_escape(ns))?;
    }
    for (key, value) in &element.attributes {
        write!(out, r#" {}="{}""#, key, xml_escape(value))?;
    }
    if element.children.is_empty() && element.text.is_none() {
        return write!(out, "/>");
    }
    write!(out, ">")?;
    if let Some(text) = &element.text {
        write!(out, "{}", xml_escape(text))?;
    }
    for child in &element.children {
        write_element(out, child, None)?;
    }
    write!(out, "</{}>", element.name)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
