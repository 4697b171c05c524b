//! Handler references stored on routes

use super::params::{Arguments, ParamSpec};
use crate::middleware::short_type_name;
use crate::request::RequestContext;
use crate::response::Response;
use std::collections::HashMap;
use std::sync::Arc;

/// Signature every handler is invoked through
pub type HandlerFn = dyn Fn(Arguments, &RequestContext, &mut Response) + Send + Sync;

/// A closure together with its declared parameters
pub struct CallableHandler {
    params: Vec<ParamSpec>,
    call: Box<HandlerFn>,
}

impl CallableHandler {
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn call(&self, args: Arguments, request: &RequestContext, response: &mut Response) {
        (self.call)(args, request, response)
    }
}

/// A `(type, method)` pair; the owning type is built fresh on every call
pub struct MethodRef {
    type_name: &'static str,
    method: String,
    params: Vec<ParamSpec>,
    invoke: Box<HandlerFn>,
}

impl MethodRef {
    /// Bind `method` on `C`.
    ///
    /// Each invocation builds a new `C` through `Default` and calls `f` on it.
    pub fn new<C, F>(method: &str, params: Vec<ParamSpec>, f: F) -> Self
    where
        C: Default + 'static,
        F: Fn(&mut C, Arguments, &RequestContext, &mut Response) + Send + Sync + 'static,
    {
        Self {
            type_name: short_type_name(std::any::type_name::<C>()),
            method: method.to_string(),
            params,
            invoke: Box::new(move |args: Arguments, request: &RequestContext, response: &mut Response| {
                let mut instance = C::default();
                f(&mut instance, args, request, response)
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// `Type@method`
    pub fn key(&self) -> String {
        format!("{}@{}", self.type_name, self.method)
    }

    pub fn call(&self, args: Arguments, request: &RequestContext, response: &mut Response) {
        (self.invoke)(args, request, response)
    }
}

impl std::fmt::Debug for MethodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRef")
            .field("type_name", &self.type_name)
            .field("method", &self.method)
            .field("params", &self.params)
            .finish()
    }
}

/// Handler attached to a route
#[derive(Clone)]
pub enum HandlerRef {
    Callable(Arc<CallableHandler>),
    Method(Arc<MethodRef>),
    /// `"Type@method"` looked up in the action registry at dispatch time
    Action(String),
}

impl HandlerRef {
    /// A closure receiving arguments for `params`
    pub fn callable<F>(params: Vec<ParamSpec>, f: F) -> Self
    where
        F: Fn(Arguments, &RequestContext, &mut Response) + Send + Sync + 'static,
    {
        HandlerRef::Callable(Arc::new(CallableHandler {
            params,
            call: Box::new(f),
        }))
    }

    /// A closure that declares no parameters
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&RequestContext, &mut Response) + Send + Sync + 'static,
    {
        Self::callable(Vec::new(), move |_args, request, response| f(request, response))
    }

    pub fn method(method: MethodRef) -> Self {
        HandlerRef::Method(Arc::new(method))
    }

    pub fn action(name: impl Into<String>) -> Self {
        HandlerRef::Action(name.into())
    }

    /// Human readable label for logs and route listings
    pub fn describe(&self) -> String {
        match self {
            HandlerRef::Callable(_) => "closure".to_string(),
            HandlerRef::Method(method) => method.key(),
            HandlerRef::Action(name) => name.clone(),
        }
    }
}

impl From<MethodRef> for HandlerRef {
    fn from(method: MethodRef) -> Self {
        HandlerRef::method(method)
    }
}

impl std::fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerRef::Callable(handler) => f
                .debug_struct("Callable")
                .field("params", &handler.params)
                .finish(),
            HandlerRef::Method(method) => f.debug_tuple("Method").field(&method.key()).finish(),
            HandlerRef::Action(name) => f.debug_tuple("Action").field(name).finish(),
        }
    }
}

/// Named `(type, method)` handlers addressable as `"Type@method"`
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<MethodRef>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method` under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, method: MethodRef) {
        let name = name.into();
        tracing::debug!(action = %name, target_method = %method.key(), "registered action");
        self.actions.insert(name, Arc::new(method));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<MethodRef>> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct UserController {
        calls: u32,
    }

    impl UserController {
        fn show(&mut self, args: Arguments, _request: &RequestContext, response: &mut Response) {
            self.calls += 1;
            response.set_text(format!(
                "user {} (call {})",
                args.text("id").unwrap_or("?"),
                self.calls
            ));
        }
    }

    #[test]
    fn test_method_ref_builds_fresh_instance() {
        let method = MethodRef::new::<UserController, _>(
            "show",
            vec![ParamSpec::text("id")],
            UserController::show,
        );
        assert_eq!(method.key(), "UserController@show");

        let request = RequestContext::get("/");
        for _ in 0..2 {
            let mut response = Response::new();
            method.call(Arguments::new(), &request, &mut response);
            // A shared instance would report call 2 the second time
            assert_eq!(response.body_string(), "user ? (call 1)");
        }
    }

    #[test]
    fn test_describe() {
        let handler = HandlerRef::from_fn(|_req, _resp| {});
        assert_eq!(handler.describe(), "closure");

        let handler: HandlerRef =
            MethodRef::new::<UserController, _>("show", Vec::new(), UserController::show).into();
        assert_eq!(handler.describe(), "UserController@show");

        assert_eq!(HandlerRef::action("Posts@index").describe(), "Posts@index");
    }

    #[test]
    fn test_action_registry() {
        let mut actions = ActionRegistry::new();
        actions.register(
            "UserController@show",
            MethodRef::new::<UserController, _>("show", Vec::new(), UserController::show),
        );

        assert!(actions.contains("UserController@show"));
        assert_eq!(actions.get("UserController@show").map(|m| m.method()), Some("show"));
        assert!(actions.get("UserController@edit").is_none());
    }
}
