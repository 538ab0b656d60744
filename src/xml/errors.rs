//! # XML Pipeline Errors
//!
//! Error types for parsing, serialization, and XPath evaluation.

use thiserror::Error;

/// Result type for XML pipeline operations
pub type XmlResult<T> = Result<T, XmlError>;

/// XML pipeline errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    /// Input is not a well-formed, policy-conforming XML document
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The parser itself could not be constructed. Environment
    /// misconfiguration; callers should abort initialization.
    #[error("parser setup failed: {0}")]
    ParserSetup(String),

    /// An XPath expression could not be compiled or evaluated
    #[error("XPath evaluation failed: {0}")]
    XPathEvaluation(String),
}

impl XmlError {
    /// Create a malformed-input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a parser-setup error
    pub fn parser_setup(msg: impl Into<String>) -> Self {
        Self::ParserSetup(msg.into())
    }

    /// Create an XPath evaluation error
    pub fn xpath(msg: impl Into<String>) -> Self {
        Self::XPathEvaluation(msg.into())
    }

    /// True when the error indicates an unusable environment rather than
    /// bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ParserSetup(_))
    }
}
