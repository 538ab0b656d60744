//! # Operation Routing
//!
//! Priority-ranked dispatch across an open-ended set of pluggable
//! operation handlers.
//!
//! ## Architecture
//!
//! - **HandlingPriority**: totally ordered eagerness value with a
//!   cannot-handle sentinel
//! - **OperationRouter**: probes every candidate, picks the strict
//!   maximum, ties go to the first registered

pub mod errors;
pub mod priority;
pub mod selector;

pub use errors::{OperationError, OperationResult, PriorityError, PriorityResult};
pub use priority::HandlingPriority;
pub use selector::{operation_name, OperationHandler, OperationRouter};
