//! Short-circuiting middleware chain for a matched route

use super::{MiddlewareRef, MiddlewareRegistry};
use crate::errors::DispatchResult;
use crate::request::RequestContext;
use crate::response::Response;

/// How a chain run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every middleware returned `true`
    Completed,
    /// The middleware at `position` returned `false`
    Halted { middleware: String, position: usize },
}

impl ChainOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ChainOutcome::Completed)
    }
}

/// The ordered middleware of one route, bound to the registry used to build them
pub struct MiddlewareChain<'a> {
    entries: &'a [MiddlewareRef],
    registry: &'a MiddlewareRegistry,
}

impl<'a> MiddlewareChain<'a> {
    pub fn new(entries: &'a [MiddlewareRef], registry: &'a MiddlewareRegistry) -> Self {
        Self { entries, registry }
    }

    /// Build and run each middleware in order.
    ///
    /// Stops at the first `false`; entries after it are neither built nor run.
    /// A construction failure is returned as an error after any earlier
    /// entries have already run. Their side effects are kept.
    pub fn run(
        &self,
        request: &mut RequestContext,
        response: &mut Response,
    ) -> DispatchResult<ChainOutcome> {
        for (position, entry) in self.entries.iter().enumerate() {
            let mut middleware = self.registry.instantiate(entry)?;

            tracing::trace!(middleware = entry.name(), position, "running middleware");
            if !middleware.handle(request, response) {
                return Ok(ChainOutcome::Halted {
                    middleware: entry.name().to_string(),
                    position,
                });
            }
        }

        Ok(ChainOutcome::Completed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Middleware names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(MiddlewareRef::name).collect()
    }
}
