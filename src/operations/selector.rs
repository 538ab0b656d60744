//! # Handler Selection
//!
//! Routes a parsed request to the registered handler that declared the
//! greatest handling priority.
//!
//! Selection is deterministic for a fixed registration order: handlers are
//! probed in registration order and only a strictly greater priority
//! displaces the current best, so ties resolve to the first-registered
//! candidate.

use std::sync::Arc;

use crate::xml::Document;

use super::errors::{OperationError, OperationResult};
use super::priority::HandlingPriority;

/// A unit of logic capable of servicing protocol operations
pub trait OperationHandler: Send + Sync {
    /// Probe whether this handler can service the request
    ///
    /// Probes must be cheap and side-effect-free; they run on every
    /// dispatch attempt.
    fn probe(&self, request: &Document) -> HandlingPriority;

    /// Service the request, producing a response document
    fn execute(&self, request: &Document) -> OperationResult<Document>;
}

/// Registry of candidate handlers with priority-based selection
#[derive(Default)]
pub struct OperationRouter {
    handlers: Vec<Arc<dyn OperationHandler>>,
}

impl OperationRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate handler
    ///
    /// Registration order is the tie-break order for equal priorities.
    pub fn register(&mut self, handler: Arc<dyn OperationHandler>) {
        self.handlers.push(handler);
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Select the handler that declared the greatest priority
    ///
    /// Candidates answering `CannotHandle` are discarded. Selection takes
    /// `&self` and holds no lock; concurrent selection for independent
    /// requests is safe.
    pub fn select(&self, request: &Document) -> OperationResult<Arc<dyn OperationHandler>> {
        let mut best: Option<(HandlingPriority, &Arc<dyn OperationHandler>)> = None;
        for handler in &self.handlers {
            let priority = handler.probe(request);
            if priority.is_cannot_handle() {
                continue;
            }
            match best {
                Some((current, _)) if priority <= current => {}
                _ => best = Some((priority, handler)),
            }
        }
        match best {
            Some((priority, handler)) => {
                tracing::debug!(?priority, "selected operation handler");
                Ok(Arc::clone(handler))
            }
            None => {
                let operation = operation_name(request);
                tracing::debug!(%operation, "no applicable handler");
                Err(OperationError::no_applicable_handler(operation))
            }
        }
    }

    /// Select a handler and execute the request against it
    pub fn dispatch(&self, request: &Document) -> OperationResult<Document> {
        self.select(request)?.execute(request)
    }
}

/// Operation identity of a request: the first element child of an `rpc`
/// root (the operation element), otherwise the root's local name
pub fn operation_name(request: &Document) -> String {
    match request.root() {
        Some(root) if root.local_name() == "rpc" => root
            .child_elements()
            .next()
            .map(|operation| operation.local_name().to_string())
            .unwrap_or_else(|| "rpc".to_string()),
        Some(root) => root.local_name().to_string(),
        None => "unknown".to_string(),
    }
}
