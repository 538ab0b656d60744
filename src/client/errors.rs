//! # Client Errors
//!
//! Error types for session dispatch and established sessions.

use thiserror::Error;

use crate::xml::XmlError;

/// Result type for session dispatch
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Why a dispatch attempt failed
///
/// Terminal for the attempt; retry policy belongs to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The transport connection could not be established
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// The hello exchange failed
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// The peers share no usable capability set
    #[error("capability mismatch: {0}")]
    CapabilityMismatch(String),

    /// The caller-supplied bound elapsed before the session was established
    #[error("timed out after {secs}s")]
    Timeout {
        /// The configured bound in seconds
        secs: u64,
    },

    /// The attempt was cancelled before resolution
    #[error("dispatch cancelled")]
    Cancelled,
}

impl DispatchError {
    /// Stage of the dispatch attempt that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ConnectFailed(_) => "connect",
            Self::HandshakeFailed(_) => "handshake",
            Self::CapabilityMismatch(_) => "capabilities",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Result type for established-session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors on an established session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The underlying transport failed
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),

    /// A received message failed the XML pipeline
    #[error(transparent)]
    Xml(#[from] XmlError),
}
