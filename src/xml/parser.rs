//! # Hardened Parser
//!
//! Event-driven parsing of protocol messages into [`Document`] trees.
//!
//! Security posture:
//! - DOCTYPE declarations are rejected outright
//! - only the five predefined entities and character references are ever
//!   expanded; any other entity reference fails the parse
//! - elements in the XInclude namespace are rejected, never processed
//! - depth and input-size limits bound memory per message
//!
//! A fresh event reader is constructed for every parse, so concurrent
//! callers never share mutable parser state.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::document::{Attribute, Document, Element};
use super::errors::{XmlError, XmlResult};

const XINCLUDE_NAMESPACE: &str = "http://www.w3.org/2001/XInclude";

/// Bounds enforced by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    /// Maximum element nesting depth
    pub max_depth: usize,
    /// Maximum accepted input size in bytes
    pub max_input_bytes: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_input_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ParserLimits {
    /// Validate the limits before any parsing happens
    ///
    /// Zero limits would reject every document; treat them as environment
    /// misconfiguration.
    pub fn validate(&self) -> XmlResult<()> {
        if self.max_depth == 0 {
            return Err(XmlError::parser_setup("max_depth must be non-zero"));
        }
        if self.max_input_bytes == 0 {
            return Err(XmlError::parser_setup("max_input_bytes must be non-zero"));
        }
        Ok(())
    }
}

/// Parse a document from text with default limits
pub fn parse_document(text: &str) -> XmlResult<Document> {
    parse_with_limits(text, &ParserLimits::default())
}

/// Parse a document from raw bytes (UTF-8) with default limits
pub fn parse_bytes(bytes: &[u8]) -> XmlResult<Document> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| XmlError::malformed(format!("input is not valid UTF-8: {e}")))?;
    parse_document(text)
}

/// Parse a document and return its root element
pub fn parse_root(text: &str) -> XmlResult<Element> {
    let document = parse_document(text)?;
    document
        .root()
        .cloned()
        .ok_or_else(|| XmlError::malformed("document has no root element"))
}

/// Parse a document under explicit limits
pub fn parse_with_limits(text: &str, limits: &ParserLimits) -> XmlResult<Document> {
    limits.validate()?;
    if text.len() > limits.max_input_bytes {
        return Err(XmlError::malformed(format!(
            "input exceeds {} bytes",
            limits.max_input_bytes
        )));
    }

    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((resolution, Event::Start(start))) => {
                if stack.len() >= limits.max_depth {
                    return Err(XmlError::malformed(format!(
                        "element depth exceeds {}",
                        limits.max_depth
                    )));
                }
                stack.push(element_from_start(resolution, &start)?);
            }
            Ok((resolution, Event::Empty(start))) => {
                let element = element_from_start(resolution, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok((_, Event::End(_))) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok((_, Event::Text(text))) => {
                let content = text
                    .unescape()
                    .map_err(|e| XmlError::malformed(format!("bad character data: {e}")))?;
                append_text(&mut stack, &content)?;
            }
            Ok((_, Event::CData(data))) => {
                let bytes = data.into_inner();
                let content = std::str::from_utf8(&bytes)
                    .map_err(|e| XmlError::malformed(format!("CDATA is not valid UTF-8: {e}")))?;
                append_text(&mut stack, content)?;
            }
            // Insignificant for message semantics
            Ok((_, Event::Comment(_) | Event::Decl(_) | Event::PI(_))) => {}
            Ok((_, Event::DocType(_))) => {
                return Err(XmlError::malformed("DOCTYPE declarations are not allowed"));
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(XmlError::malformed(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::malformed("unclosed element at end of input"));
    }
    match root {
        Some(element) => Ok(Document::with_root(element)),
        None => Err(XmlError::malformed("document has no root element")),
    }
}

fn element_from_start(resolution: ResolveResult<'_>, start: &BytesStart<'_>) -> XmlResult<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| XmlError::malformed(format!("element name is not valid UTF-8: {e}")))?
        .to_string();

    let namespace = match resolution {
        ResolveResult::Bound(ns) => Some(
            String::from_utf8(ns.as_ref().to_vec())
                .map_err(|e| XmlError::malformed(format!("namespace is not valid UTF-8: {e}")))?,
        ),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(XmlError::malformed(format!(
                "unbound namespace prefix `{}`",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };
    if namespace.as_deref() == Some(XINCLUDE_NAMESPACE) {
        return Err(XmlError::malformed("XInclude directives are not allowed"));
    }

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::malformed(format!("bad attribute: {e}")))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| XmlError::malformed(format!("attribute name is not valid UTF-8: {e}")))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::malformed(format!("bad attribute value: {e}")))?
            .into_owned();
        attributes.push(Attribute { name: key, value });
    }

    Ok(Element::from_parts(name, namespace, attributes))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> XmlResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.append_child(element);
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(XmlError::malformed("multiple root elements"));
            }
            *root = Some(element);
            Ok(())
        }
    }
}

fn append_text(stack: &mut [Element], content: &str) -> XmlResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.append_text(content);
            Ok(())
        }
        // trim_text already suppressed pure whitespace
        None => Err(XmlError::malformed("character data outside root element")),
    }
}
