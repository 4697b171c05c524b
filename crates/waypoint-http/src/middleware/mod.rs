//! # Middleware
//!
//! Middleware are pre-handler gates with a `handle(request, response) -> bool`
//! contract. Returning `false` stops dispatch for the request; whatever the
//! middleware wrote into the response is what the caller sends.
//!
//! Routes do not hold middleware instances. They hold [`MiddlewareRef`]s, and
//! a fresh instance is built from the reference for every request, so no
//! middleware state survives between requests.

pub mod chain;

pub use chain::{ChainOutcome, MiddlewareChain};

use crate::errors::{DispatchError, DispatchResult};
use crate::request::RequestContext;
use crate::response::Response;
use std::collections::HashMap;
use std::sync::Arc;

/// A pre-handler gate
pub trait Middleware {
    /// Inspect or annotate the request, optionally write to the response.
    ///
    /// Return `false` to stop dispatch.
    fn handle(&mut self, request: &mut RequestContext, response: &mut Response) -> bool;

    /// Middleware name for logs
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Builds a middleware instance; an `Err` carries the reason it could not be built
pub type MiddlewareFactory = dyn Fn() -> Result<Box<dyn Middleware>, String> + Send + Sync;

/// Reference to a middleware type, resolved to a fresh instance per request
#[derive(Clone)]
pub enum MiddlewareRef {
    /// A factory captured at registration time
    Factory {
        name: String,
        factory: Arc<MiddlewareFactory>,
    },
    /// An alias looked up in the router's middleware registry at dispatch time
    Named(String),
}

impl MiddlewareRef {
    /// Reference a middleware type built through `Default`
    pub fn of<M>() -> Self
    where
        M: Middleware + Default + 'static,
    {
        Self::Factory {
            name: short_type_name(std::any::type_name::<M>()).to_string(),
            factory: Arc::new(|| Ok::<_, String>(Box::new(M::default()) as Box<dyn Middleware>)),
        }
    }

    /// Reference a middleware built by `factory`
    pub fn from_factory<M, F>(name: impl Into<String>, factory: F) -> Self
    where
        M: Middleware + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        Self::Factory {
            name: name.into(),
            factory: Arc::new(move || Ok::<_, String>(Box::new(factory()) as Box<dyn Middleware>)),
        }
    }

    /// Reference a middleware whose construction can fail
    pub fn try_from_factory<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Middleware>, String> + Send + Sync + 'static,
    {
        Self::Factory {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    /// Wrap a plain function as middleware
    pub fn from_fn<F>(name: impl Into<String>, handle: F) -> Self
    where
        F: Fn(&mut RequestContext, &mut Response) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let handle = Arc::new(handle);
        let label = name.clone();
        Self::Factory {
            name,
            factory: Arc::new(move || {
                Ok::<_, String>(Box::new(FnMiddleware {
                    name: label.clone(),
                    handle: Arc::clone(&handle),
                }) as Box<dyn Middleware>)
            }),
        }
    }

    /// Reference a middleware registered under an alias
    pub fn named(alias: impl Into<String>) -> Self {
        Self::Named(alias.into())
    }

    /// Name used in logs and route introspection
    pub fn name(&self) -> &str {
        match self {
            MiddlewareRef::Factory { name, .. } => name,
            MiddlewareRef::Named(alias) => alias,
        }
    }
}

impl std::fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MiddlewareRef::Factory { name, .. } => f.debug_tuple("Factory").field(name).finish(),
            MiddlewareRef::Named(alias) => f.debug_tuple("Named").field(alias).finish(),
        }
    }
}

struct FnMiddleware<F> {
    name: String,
    handle: Arc<F>,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut RequestContext, &mut Response) -> bool,
{
    fn handle(&mut self, request: &mut RequestContext, response: &mut Response) -> bool {
        tracing::trace!(middleware = %self.name, "running function middleware");
        (*self.handle)(request, response)
    }

    fn name(&self) -> &'static str {
        "FnMiddleware"
    }
}

/// Aliases for middleware, filled during registration
#[derive(Debug, Clone, Default)]
pub struct MiddlewareRegistry {
    aliases: HashMap<String, MiddlewareRef>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `middleware` under `alias`, replacing any previous entry
    pub fn alias(&mut self, alias: impl Into<String>, middleware: MiddlewareRef) {
        self.aliases.insert(alias.into(), middleware);
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// Build a fresh instance for `middleware`, following aliases
    pub fn instantiate(&self, middleware: &MiddlewareRef) -> DispatchResult<Box<dyn Middleware>> {
        let mut current = middleware;
        // Each hop must land on a new alias, so more hops than aliases is a cycle
        for _ in 0..=self.aliases.len() {
            match current {
                MiddlewareRef::Factory { name, factory } => {
                    return factory().map_err(|reason| {
                        DispatchError::middleware_construction(name.clone(), reason)
                    });
                }
                MiddlewareRef::Named(alias) => {
                    current = self.aliases.get(alias).ok_or_else(|| {
                        DispatchError::middleware_construction(
                            alias.clone(),
                            "no middleware registered under this alias",
                        )
                    })?;
                }
            }
        }

        Err(DispatchError::middleware_construction(
            middleware.name().to_string(),
            "middleware aliases form a cycle",
        ))
    }
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
