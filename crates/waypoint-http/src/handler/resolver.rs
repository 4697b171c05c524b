//! Argument resolution for matched handlers
//!
//! For every declared parameter, in declaration order:
//!
//! 1. a route parameter with the same name binds its string value;
//! 2. otherwise a constructible parameter gets a fresh instance;
//! 3. otherwise the declared default is used;
//! 4. otherwise the argument is [`Argument::Absent`].
//!
//! Construction goes one level deep. Factories build their value on their
//! own and nothing here resolves the factory's dependencies.

use super::handler_ref::{ActionRegistry, CallableHandler, HandlerRef, MethodRef};
use super::params::{Argument, Arguments, ParamKind, ParamSpec};
use crate::errors::{DispatchError, DispatchResult};
use crate::request::RequestContext;
use crate::response::Response;
use crate::routing::ExtractedParams;
use std::sync::Arc;
use waypoint_core::ProviderRegistry;

/// A handler reference resolved to something invocable
#[derive(Clone)]
pub enum ResolvedHandler {
    Callable(Arc<CallableHandler>),
    Method(Arc<MethodRef>),
}

impl ResolvedHandler {
    /// Declared parameters of the handler
    pub fn params(&self) -> &[ParamSpec] {
        match self {
            ResolvedHandler::Callable(handler) => handler.params(),
            ResolvedHandler::Method(method) => method.params(),
        }
    }

    pub fn invoke(&self, args: Arguments, request: &RequestContext, response: &mut Response) {
        match self {
            ResolvedHandler::Callable(handler) => handler.call(args, request, response),
            ResolvedHandler::Method(method) => method.call(args, request, response),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ResolvedHandler::Callable(_) => "closure".to_string(),
            ResolvedHandler::Method(method) => method.key(),
        }
    }
}

/// Maps route parameters and providers onto a handler's declared parameters
pub struct ArgumentResolver<'a> {
    providers: &'a ProviderRegistry,
    actions: &'a ActionRegistry,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(providers: &'a ProviderRegistry, actions: &'a ActionRegistry) -> Self {
        Self { providers, actions }
    }

    /// Turn a handler reference into an invocable handler.
    ///
    /// Fails with `InvalidHandler` for an action that is malformed or not
    /// registered.
    pub fn resolve_handler(&self, handler: &HandlerRef) -> DispatchResult<ResolvedHandler> {
        match handler {
            HandlerRef::Callable(callable) => Ok(ResolvedHandler::Callable(Arc::clone(callable))),
            HandlerRef::Method(method) => Ok(ResolvedHandler::Method(Arc::clone(method))),
            HandlerRef::Action(name) => {
                let well_formed = matches!(
                    name.split_once('@'),
                    Some((owner, method)) if !owner.is_empty() && !method.is_empty() && !method.contains('@')
                );
                if !well_formed {
                    return Err(DispatchError::invalid_handler(
                        name.clone(),
                        "expected an action of the form 'Type@method'",
                    ));
                }

                self.actions
                    .get(name)
                    .map(|method| ResolvedHandler::Method(Arc::clone(method)))
                    .ok_or_else(|| {
                        DispatchError::invalid_handler(name.clone(), "no action registered under this name")
                    })
            }
        }
    }

    /// Resolve the arguments for `handler` given the route's bound parameters
    pub fn resolve(&self, params: &ExtractedParams, handler: &HandlerRef) -> DispatchResult<Arguments> {
        let resolved = self.resolve_handler(handler)?;
        self.resolve_params(params, resolved.params())
    }

    /// Resolve arguments for an explicit parameter list
    pub fn resolve_params(&self, params: &ExtractedParams, specs: &[ParamSpec]) -> DispatchResult<Arguments> {
        let mut args = Arguments::new();
        for spec in specs {
            let argument = self.resolve_one(params, spec)?;
            tracing::trace!(param = spec.name(), argument = ?argument, "resolved argument");
            args.push(spec.name(), argument);
        }
        Ok(args)
    }

    fn resolve_one(&self, params: &ExtractedParams, spec: &ParamSpec) -> DispatchResult<Argument> {
        if let Some(value) = params.get_str(spec.name()) {
            return Ok(Argument::Text(value.to_string()));
        }

        match spec.kind() {
            ParamKind::Text => {}
            ParamKind::Construct { factory, .. } => return Ok(Argument::Instance(factory())),
            ParamKind::Service(service) => {
                if self.providers.contains_service(service) {
                    let instance = self
                        .providers
                        .construct_any(service)
                        .map_err(|e| DispatchError::argument_construction(spec.name(), e))?;
                    return Ok(Argument::Instance(instance));
                }
                tracing::debug!(
                    param = spec.name(),
                    service = service.type_name(),
                    "no provider registered, falling back"
                );
            }
        }

        Ok(match spec.default_value() {
            Some(default) => Argument::Default(default.clone()),
            None => Argument::Absent,
        })
    }
}
