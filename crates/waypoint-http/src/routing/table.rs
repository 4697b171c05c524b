//! Ordered route storage with first-match lookup

use super::extraction::ExtractedParams;
use super::pattern::RoutePattern;
use super::HttpMethod;
use crate::handler::HandlerRef;
use crate::middleware::MiddlewareRef;
use serde::Serialize;

/// A registered route with its path and middleware fully expanded
#[derive(Debug, Clone)]
pub struct Route {
    method: HttpMethod,
    pattern: RoutePattern,
    handler: HandlerRef,
    middleware: Vec<MiddlewareRef>,
}

impl Route {
    pub fn new(
        method: HttpMethod,
        pattern: RoutePattern,
        handler: HandlerRef,
        middleware: Vec<MiddlewareRef>,
    ) -> Self {
        Self {
            method,
            pattern,
            handler,
            middleware,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The template as registered, group prefixes included
    pub fn path(&self) -> &str {
        &self.pattern.original_path
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Middleware in execution order: outer groups first, route-own last
    pub fn middleware(&self) -> &[MiddlewareRef] {
        &self.middleware
    }

    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            method: self.method,
            path: self.pattern.original_path.clone(),
            params: self.pattern.param_names.clone(),
            middleware: self
                .middleware
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
            handler: self.handler.describe(),
        }
    }
}

/// Serializable summary of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<String>,
    pub middleware: Vec<String>,
    pub handler: String,
}

/// Routes in registration order
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route; earlier routes take precedence at lookup
    pub fn register(&mut self, route: Route) {
        tracing::debug!(
            method = %route.method,
            path = %route.path(),
            middleware = route.middleware.len(),
            "registered route"
        );
        self.routes.push(route);
    }

    /// First route, in registration order, whose method is equal and whose
    /// pattern matches `path`
    pub fn lookup(&self, method: HttpMethod, path: &str) -> Option<(&Route, ExtractedParams)> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| route.pattern.match_path(path).map(|params| (route, params)))
    }

    /// Methods that have at least one route matching `path`, in registration order
    pub fn methods_for(&self, path: &str) -> Vec<HttpMethod> {
        let mut methods = Vec::new();
        for route in &self.routes {
            if !methods.contains(&route.method) && route.pattern.matches(path) {
                methods.push(route.method);
            }
        }
        methods
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(label: &'static str) -> HandlerRef {
        HandlerRef::from_fn(move |_req, resp| resp.set_text(label))
    }

    fn table(routes: &[(HttpMethod, &str, &'static str)]) -> RouteTable {
        let mut table = RouteTable::new();
        for (method, path, label) in routes {
            table.register(Route::new(
                *method,
                RoutePattern::parse(path).unwrap(),
                labelled(*label),
                Vec::new(),
            ));
        }
        table
    }

    fn matched_label(table: &RouteTable, method: HttpMethod, path: &str) -> Option<String> {
        let (route, _) = table.lookup(method, path)?;
        Some(route.path().to_string())
    }

    #[test]
    fn test_literal_routes_match_only_themselves() {
        let paths = ["/", "/users", "/users/active", "/posts", "/about/team"];
        let table = table(&paths.map(|p| (HttpMethod::GET, p, "h")));

        for path in paths {
            assert_eq!(matched_label(&table, HttpMethod::GET, path).as_deref(), Some(path));
            assert!(table.lookup(HttpMethod::POST, path).is_none());
        }
        assert!(table.lookup(HttpMethod::GET, "/users/inactive").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let table = table(&[
            (HttpMethod::GET, "/users/{id:\\d+}", "by-id"),
            (HttpMethod::GET, "/users/profile", "profile"),
            (HttpMethod::GET, "/users/{name}", "by-name"),
        ]);

        let (route, params) = table.lookup(HttpMethod::GET, "/users/profile").unwrap();
        assert_eq!(route.path(), "/users/profile");
        assert!(params.is_empty());

        let (route, params) = table.lookup(HttpMethod::GET, "/users/12").unwrap();
        assert_eq!(route.path(), "/users/{id:\\d+}");
        assert_eq!(params.get_str("id"), Some("12"));

        let (route, params) = table.lookup(HttpMethod::GET, "/users/ada").unwrap();
        assert_eq!(route.path(), "/users/{name}");
        assert_eq!(params.get_str("name"), Some("ada"));
    }

    #[test]
    fn test_methods_for_path() {
        let table = table(&[
            (HttpMethod::GET, "/users/{id}", "show"),
            (HttpMethod::PUT, "/users/{id}", "update"),
            (HttpMethod::GET, "/users/{id:\\d+}", "show-numeric"),
            (HttpMethod::POST, "/users", "create"),
        ]);

        assert_eq!(table.methods_for("/users/1"), vec![HttpMethod::GET, HttpMethod::PUT]);
        assert_eq!(table.methods_for("/users"), vec![HttpMethod::POST]);
        assert!(table.methods_for("/nothing").is_empty());
    }

    #[test]
    fn test_route_info() {
        let mut table = RouteTable::new();
        table.register(Route::new(
            HttpMethod::DELETE,
            RoutePattern::parse("/posts/{post}/comments/{comment:\\d+}").unwrap(),
            HandlerRef::action("Comments@destroy"),
            vec![MiddlewareRef::named("auth")],
        ));

        let info = table.routes()[0].info();
        assert_eq!(info.method, HttpMethod::DELETE);
        assert_eq!(info.params, vec!["post", "comment"]);
        assert_eq!(info.middleware, vec!["auth"]);
        assert_eq!(info.handler, "Comments@destroy");
    }
}
