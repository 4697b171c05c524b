//! Request dispatch
//!
//! The dispatcher owns a frozen route table and the registries built during
//! setup. It never mutates them, so one instance can serve many threads.

use crate::config::DispatchConfig;
use crate::errors::DispatchResult;
use crate::handler::{ActionRegistry, ArgumentResolver, HandlerRef};
use crate::middleware::{ChainOutcome, MiddlewareChain, MiddlewareRegistry};
use crate::request::RequestContext;
use crate::response::Response;
use crate::routing::{ExtractedParams, HttpMethod, RouteInfo, RouteTable};
use serde::Serialize;
use waypoint_core::ProviderRegistry;

/// How a dispatch ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// A route matched and its handler ran
    Handled { method: HttpMethod, path: String },
    /// A middleware stopped dispatch before the handler
    Halted { middleware: String },
    /// No route matched; the 404 path ran
    NotFound,
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchOutcome::NotFound)
    }
}

/// Immutable route table plus everything needed to serve a request
#[derive(Debug)]
pub struct Dispatcher {
    table: RouteTable,
    not_found: Option<HandlerRef>,
    middleware: MiddlewareRegistry,
    actions: ActionRegistry,
    providers: ProviderRegistry,
    config: DispatchConfig,
}

impl Dispatcher {
    pub(crate) fn new(
        table: RouteTable,
        not_found: Option<HandlerRef>,
        middleware: MiddlewareRegistry,
        actions: ActionRegistry,
        providers: ProviderRegistry,
        config: DispatchConfig,
    ) -> Self {
        Self {
            table,
            not_found,
            middleware,
            actions,
            providers,
            config,
        }
    }

    /// Dispatch one request.
    ///
    /// Runs the first matching route's middleware chain and, if the chain
    /// completes, its handler. With no match the response becomes a 404 and
    /// the not-found handler runs, or the configured body is written.
    /// Handler and middleware configuration errors are returned as `Err`;
    /// not finding a route is not an error.
    pub fn run(
        &self,
        request: &mut RequestContext,
        response: &mut Response,
    ) -> DispatchResult<DispatchOutcome> {
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request.request_id(),
            method = %request.method_name(),
            path = %request.path(),
        );
        let _enter = span.enter();

        let result = self.run_inner(request, response);
        if let Err(e) = &result {
            tracing::error!(error = %e, code = e.error_code(), "dispatch failed");
        }
        result
    }

    fn run_inner(
        &self,
        request: &mut RequestContext,
        response: &mut Response,
    ) -> DispatchResult<DispatchOutcome> {
        let matched = request
            .method()
            .and_then(|method| self.table.lookup(method, request.path()));
        let Some((route, params)) = matched else {
            return self.not_found(request, response);
        };

        tracing::debug!(route = %route.path(), params = params.len(), "route matched");
        request.set_route_params(params);

        let chain = MiddlewareChain::new(route.middleware(), &self.middleware);
        if let ChainOutcome::Halted { middleware, position } = chain.run(request, response)? {
            tracing::warn!(
                middleware = %middleware,
                position,
                status = response.status(),
                "middleware halted dispatch"
            );
            return Ok(DispatchOutcome::Halted { middleware });
        }

        let resolver = self.resolver();
        let handler = resolver.resolve_handler(route.handler())?;
        let args = resolver.resolve_params(request.route_params(), handler.params())?;

        tracing::debug!(handler = %handler.describe(), args = args.len(), "invoking handler");
        handler.invoke(args, request, response);

        Ok(DispatchOutcome::Handled {
            method: route.method(),
            path: route.path().to_string(),
        })
    }

    fn not_found(
        &self,
        request: &mut RequestContext,
        response: &mut Response,
    ) -> DispatchResult<DispatchOutcome> {
        let allowed = self.table.methods_for(request.path());
        if request.method().is_none() {
            tracing::debug!(allowed = ?allowed, "method is not routable");
        } else if allowed.is_empty() {
            tracing::debug!("no route matched");
        } else {
            tracing::debug!(allowed = ?allowed, "path matched under other methods only");
        }

        response.set_status(404);
        match &self.not_found {
            Some(handler) => {
                let resolver = self.resolver();
                let handler = resolver.resolve_handler(handler)?;
                let params = ExtractedParams::new();
                let args = resolver.resolve_params(&params, handler.params())?;
                handler.invoke(args, request, response);
            }
            None => response.not_found(self.config.not_found_body.as_str()),
        }

        Ok(DispatchOutcome::NotFound)
    }

    fn resolver(&self) -> ArgumentResolver<'_> {
        ArgumentResolver::new(&self.providers, &self.actions)
    }

    /// Dispatch a request given only method and target, returning the response.
    ///
    /// Any method token is accepted. One that no route can be registered
    /// under ends on the 404 path.
    pub fn dispatch(&self, method: &str, target: &str) -> DispatchResult<(DispatchOutcome, Response)> {
        let mut request = RequestContext::from_parts(method, target);
        let mut response = Response::new();
        let outcome = self.run(&mut request, &mut response)?;
        Ok((outcome, response))
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    /// Summaries of all routes in registration order
    pub fn route_info(&self) -> Vec<RouteInfo> {
        self.table.routes().iter().map(|r| r.info()).collect()
    }

    /// Methods with a route matching `path`
    pub fn allowed_methods(&self, path: &str) -> Vec<HttpMethod> {
        self.table.methods_for(path)
    }
}
