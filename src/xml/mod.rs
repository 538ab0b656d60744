//! # XML Document Pipeline
//!
//! Parses, constructs, serializes, and queries every protocol message.
//!
//! ## Architecture
//!
//! - **Document** (tree): owned element tree with namespace-correct
//!   construction
//! - **Parser** (hardened): DOCTYPE/entity attacks rejected, one parser
//!   instance per call
//! - **Serializer** (deterministic): indented output with no spurious
//!   blank lines
//! - **XPath**: compiled path expressions for message inspection

pub mod document;
pub mod errors;
pub mod parser;
pub mod serializer;
pub mod xpath;

pub use document::{prefixed_value, Attribute, Document, Element, Node, XMLNS_ATTRIBUTE};
pub use errors::{XmlError, XmlResult};
pub use parser::{parse_bytes, parse_document, parse_root, parse_with_limits, ParserLimits};
pub use serializer::{serialize_document, serialize_element, XML_DECLARATION};
pub use xpath::{XPathExpression, XPathReturnType, XPathValue};
