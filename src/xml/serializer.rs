//! # Serializer
//!
//! Deterministic, indented serialization of document trees.
//!
//! The writer is a dedicated recursive pass rather than a generic
//! transform: generic indenting transforms emit spurious blank lines on
//! many runtimes, and extra blank lines corrupt length-prefixed and
//! chunk-framed transports downstream.

use quick_xml::escape::escape;

use super::document::{Document, Element, Node};

const INDENT: &str = "  ";

/// XML declaration emitted when requested
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Serialize a document, optionally prefixed with the XML declaration
pub fn serialize_document(document: &Document, declaration: bool) -> String {
    match document.root() {
        Some(root) => serialize_element(root, declaration),
        None if declaration => XML_DECLARATION.to_string(),
        None => String::new(),
    }
}

/// Serialize an element subtree, optionally prefixed with the XML
/// declaration
pub fn serialize_element(element: &Element, declaration: bool) -> String {
    let mut out = String::new();
    if declaration {
        out.push_str(XML_DECLARATION);
        out.push('\n');
    }
    write_element(&mut out, element, 0);
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('<');
    out.push_str(element.name());
    for attribute in element.attributes() {
        out.push(' ');
        out.push_str(&attribute.name);
        out.push_str("=\"");
        out.push_str(&escape(attribute.value.as_str()));
        out.push('"');
    }

    let children = element.children();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }

    let text_only = children.iter().all(|node| matches!(node, Node::Text(_)));
    out.push('>');
    if text_only {
        for node in children {
            if let Node::Text(text) = node {
                out.push_str(&escape(text.as_str()));
            }
        }
    } else {
        for node in children {
            out.push('\n');
            match node {
                Node::Element(child) => write_element(out, child, depth + 1),
                Node::Text(text) => {
                    for _ in 0..=depth {
                        out.push_str(INDENT);
                    }
                    out.push_str(&escape(text.as_str()));
                }
            }
        }
        out.push('\n');
        for _ in 0..depth {
            out.push_str(INDENT);
        }
    }
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}
