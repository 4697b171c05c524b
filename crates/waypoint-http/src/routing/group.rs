//! Registration-time group state
//!
//! A group contributes a path prefix and middleware to every route registered
//! inside it. The state is saved on entry and restored when the scope guard
//! is dropped, which also happens while unwinding from a panicking body.

use super::router::Router;
use crate::middleware::MiddlewareRef;
use std::ops::{Deref, DerefMut};

/// Accumulated prefix and middleware of the enclosing groups
#[derive(Debug, Clone, Default)]
pub struct GroupContext {
    prefix: String,
    middleware: Vec<MiddlewareRef>,
}

impl GroupContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a group nested inside this one
    pub fn nested(&self, prefix: &str, middleware: &[MiddlewareRef]) -> Self {
        let mut combined = self.middleware.clone();
        combined.extend_from_slice(middleware);
        Self {
            prefix: join_paths(&self.prefix, prefix),
            middleware: combined,
        }
    }

    /// Accumulated prefix; `/` at the top level
    pub fn prefix(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    pub fn middleware(&self) -> &[MiddlewareRef] {
        &self.middleware
    }

    /// Full path for a route registered in this context
    pub fn full_path(&self, path: &str) -> String {
        join_paths(&self.prefix, path)
    }

    /// Group middleware followed by the route's own
    pub fn full_middleware(&self, own: Vec<MiddlewareRef>) -> Vec<MiddlewareRef> {
        let mut middleware = self.middleware.clone();
        middleware.extend(own);
        middleware
    }
}

/// Join two path fragments with exactly one `/` between them.
///
/// The result always starts with `/`; two empty fragments give `/`.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let path = path.trim_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", path),
        (false, true) => format!("/{}", prefix),
        (false, false) => format!("/{}/{}", prefix, path),
    }
}

/// Guard that restores the router's group context on drop
pub(crate) struct GroupScope<'r> {
    router: &'r mut Router,
    saved: Option<GroupContext>,
}

impl<'r> GroupScope<'r> {
    pub(crate) fn enter(router: &'r mut Router, context: GroupContext) -> Self {
        let saved = std::mem::replace(&mut router.context, context);
        tracing::trace!(prefix = router.context.prefix(), "entered route group");
        Self {
            router,
            saved: Some(saved),
        }
    }
}

impl Deref for GroupScope<'_> {
    type Target = Router;

    fn deref(&self) -> &Router {
        self.router
    }
}

impl DerefMut for GroupScope<'_> {
    fn deref_mut(&mut self) -> &mut Router {
        self.router
    }
}

impl Drop for GroupScope<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.router.context = saved;
        }
    }
}
