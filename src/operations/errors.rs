//! # Operation Errors
//!
//! Error types for priority handling and handler selection.

use thiserror::Error;

/// Result type for priority operations
pub type PriorityResult<T> = Result<T, PriorityError>;

/// Priority misuse errors
///
/// These indicate programming errors at the call site and are surfaced
/// immediately, never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriorityError {
    /// The sentinel has no numeric value to increase
    #[error("cannot increase a priority that has no value")]
    NoValue,

    /// Increases must be strictly positive
    #[error("priority increase must be positive, got {0}")]
    NonPositiveIncrease(i32),

    /// The increased value would not be representable
    #[error("priority {value} + {increase} exceeds {max}", max = i32::MAX)]
    Overflow {
        /// Current priority value
        value: i32,
        /// Requested increase
        increase: i32,
    },
}

/// Result type for handler selection and execution
pub type OperationResult<T> = Result<T, OperationError>;

/// Handler selection and execution errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    /// No registered handler can service the request
    #[error("no handler for operation `{operation}`")]
    NoApplicableHandler {
        /// Operation identity of the rejected request
        operation: String,
    },

    /// The selected handler failed while servicing the request
    #[error("operation failed: {0}")]
    ExecutionFailed(String),
}

impl OperationError {
    /// Create a no-applicable-handler error
    pub fn no_applicable_handler(operation: impl Into<String>) -> Self {
        Self::NoApplicableHandler {
            operation: operation.into(),
        }
    }

    /// Create an execution error
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}
