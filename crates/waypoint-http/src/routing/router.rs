//! Route registration surface
//!
//! A [`Router`] collects routes, groups and registries during setup and is
//! then frozen into a [`Dispatcher`] with [`Router::build`].

use super::group::{GroupContext, GroupScope};
use super::pattern::RoutePattern;
use super::table::{Route, RouteInfo, RouteTable};
use super::versioned::VersionGroup;
use super::HttpMethod;
use crate::config::DispatchConfig;
use crate::dispatcher::Dispatcher;
use crate::errors::DispatchResult;
use crate::handler::{ActionRegistry, HandlerRef, MethodRef};
use crate::middleware::{MiddlewareRef, MiddlewareRegistry};
use waypoint_core::{AppConfigTrait, CoreError, ProviderRegistry};

/// Collects routes and registries before dispatch begins
#[derive(Debug, Default)]
pub struct Router {
    table: RouteTable,
    pub(crate) context: GroupContext,
    not_found: Option<HandlerRef>,
    middleware: MiddlewareRegistry,
    actions: ActionRegistry,
    providers: ProviderRegistry,
    config: DispatchConfig,
}

impl Router {
    /// Create a router with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with the given configuration
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a router configured from `WAYPOINT_*` environment variables
    pub fn from_env() -> DispatchResult<Self> {
        Ok(Self::with_config(DispatchConfig::from_env()?))
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Register a route; the current group prefix and middleware are applied now
    pub fn route(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        let full_path = self.context.full_path(path);
        let pattern = RoutePattern::parse(&full_path)?;
        let middleware = self.context.full_middleware(middleware);
        self.table
            .register(Route::new(method, pattern, handler, middleware));
        Ok(self)
    }

    /// Register a GET route
    pub fn get(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::GET, path, handler, Vec::new())
    }

    /// Register a POST route
    pub fn post(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::POST, path, handler, Vec::new())
    }

    /// Register a PUT route
    pub fn put(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::PUT, path, handler, Vec::new())
    }

    /// Register a PATCH route
    pub fn patch(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::PATCH, path, handler, Vec::new())
    }

    /// Register a DELETE route
    pub fn delete(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::DELETE, path, handler, Vec::new())
    }

    /// Register an OPTIONS route
    pub fn options(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::OPTIONS, path, handler, Vec::new())
    }

    /// Register a HEAD route
    pub fn head(&mut self, path: &str, handler: HandlerRef) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::HEAD, path, handler, Vec::new())
    }

    pub fn get_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::GET, path, handler, middleware)
    }

    pub fn post_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::POST, path, handler, middleware)
    }

    pub fn put_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::PUT, path, handler, middleware)
    }

    pub fn patch_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::PATCH, path, handler, middleware)
    }

    pub fn delete_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::DELETE, path, handler, middleware)
    }

    pub fn options_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::OPTIONS, path, handler, middleware)
    }

    pub fn head_with(
        &mut self,
        path: &str,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> DispatchResult<&mut Self> {
        self.route(HttpMethod::HEAD, path, handler, middleware)
    }

    /// Register a GET route answering with a redirect to `target`
    pub fn redirect(&mut self, path: &str, target: &str) -> DispatchResult<&mut Self> {
        let status = self.config.redirect_status;
        self.redirect_with_status(path, target, status)
    }

    /// Like [`Router::redirect`] with an explicit status
    pub fn redirect_with_status(
        &mut self,
        path: &str,
        target: &str,
        status: u16,
    ) -> DispatchResult<&mut Self> {
        let target = target.to_string();
        let handler = HandlerRef::from_fn(move |_request, response| response.redirect(&target, status));
        self.get(path, handler)
    }

    /// Set the handler used when no route matches, replacing any previous one
    pub fn add_404_handler(&mut self, handler: HandlerRef) -> &mut Self {
        self.not_found = Some(handler);
        self
    }

    /// Register routes under `prefix` with `middleware` prepended.
    ///
    /// The enclosing prefix and middleware are restored when `body` returns,
    /// returns early or panics.
    pub fn group<F, R>(&mut self, prefix: &str, middleware: Vec<MiddlewareRef>, body: F) -> R
    where
        F: FnOnce(&mut Router) -> R,
    {
        let context = self.context.nested(prefix, &middleware);
        let mut scope = GroupScope::enter(self, context);
        body(&mut scope)
    }

    /// Register routes under an API version prefix
    pub fn version<F, R>(&mut self, group: VersionGroup, body: F) -> R
    where
        F: FnOnce(&mut Router) -> R,
    {
        let prefix = group.resolve_prefix(&self.config);
        let context = self.context.nested(&prefix, group.middleware_list());
        let mut scope = GroupScope::enter(self, context);
        body(&mut scope)
    }

    /// Register middleware under an alias for `MiddlewareRef::named`
    pub fn alias_middleware(&mut self, alias: &str, middleware: MiddlewareRef) -> &mut Self {
        self.middleware.alias(alias, middleware);
        self
    }

    /// Register a `(type, method)` handler for `HandlerRef::action`
    pub fn register_action(&mut self, name: &str, method: MethodRef) -> &mut Self {
        self.actions.register(name, method);
        self
    }

    /// Register a factory for handler parameters declared with `ParamSpec::service::<T>`
    pub fn provide<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.providers.register_transient(factory);
        self
    }

    /// Register `T` built through `Default`
    pub fn provide_default<T>(&mut self) -> &mut Self
    where
        T: Default + Send + 'static,
    {
        self.providers.register_default::<T>();
        self
    }

    /// Register a factory that may fail; a failure aborts the request
    pub fn provide_fallible<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + 'static,
        F: Fn() -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.providers.register_fallible(factory);
        self
    }

    /// Current group prefix; `/` outside any group
    pub fn current_prefix(&self) -> &str {
        self.context.prefix()
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    /// Summaries of all routes in registration order
    pub fn route_info(&self) -> Vec<RouteInfo> {
        self.table.routes().iter().map(Route::info).collect()
    }

    /// Freeze the router for dispatch
    pub fn build(self) -> Dispatcher {
        tracing::debug!(routes = self.table.len(), "route table built");
        Dispatcher::new(
            self.table,
            self.not_found,
            self.middleware,
            self.actions,
            self.providers,
            self.config,
        )
    }
}
