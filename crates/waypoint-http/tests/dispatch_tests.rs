//! End-to-end dispatch behaviour through the public API

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use waypoint_http::{
    Argument, DispatchError, DispatchOutcome, HandlerRef, HttpMethod, MethodRef, Middleware,
    MiddlewareRef, ParamSpec, RequestContext, Response, Router, VersionGroup,
};

fn counting(counter: &Arc<AtomicUsize>, label: &'static str) -> HandlerRef {
    let counter = Arc::clone(counter);
    HandlerRef::from_fn(move |_req, resp| {
        counter.fetch_add(1, Ordering::SeqCst);
        resp.set_text(label);
    })
}

fn echo_params(names: &[&str]) -> HandlerRef {
    let specs = names.iter().map(|n| ParamSpec::text(*n)).collect();
    HandlerRef::callable(specs, |args, _req, resp| {
        let rendered: Vec<String> = args
            .iter()
            .map(|(name, arg)| format!("{}={}", name, arg.as_text().unwrap_or("-")))
            .collect();
        resp.set_text(rendered.join(","));
    })
}

#[derive(Default)]
struct DenyAll;

impl Middleware for DenyAll {
    fn handle(&mut self, _request: &mut RequestContext, response: &mut Response) -> bool {
        response.set_status(401);
        response.set_text("Unauthorized");
        false
    }
}

#[derive(Default)]
struct RequireToken;

impl Middleware for RequireToken {
    fn handle(&mut self, request: &mut RequestContext, response: &mut Response) -> bool {
        match request.header("authorization") {
            Some(token) => {
                let user = token.trim_start_matches("Bearer ").to_string();
                request.set_attribute("user", json!(user));
                true
            }
            None => {
                response.set_status(401);
                false
            }
        }
    }
}

#[test]
fn literal_routes_match_exactly() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    for path in ["/", "/users", "/users/active", "/about/team"] {
        router.get(path, counting(&hits, "hit")).unwrap();
    }
    let dispatcher = router.build();

    for path in ["/", "/users", "/users/active", "/about/team"] {
        let (outcome, _) = dispatcher.dispatch("GET", path).unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Handled {
                method: HttpMethod::GET,
                path: path.to_string()
            }
        );
    }

    for path in ["/users/inactive", "/about", "/about/team/lead", "/Users"] {
        let (outcome, _) = dispatcher.dispatch("GET", path).unwrap();
        assert!(outcome.is_not_found(), "{} should not match", path);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[test]
fn digit_constraint_binds_exact_text() {
    let mut router = Router::new();
    router.get("/users/{id:\\d+}", echo_params(&["id"])).unwrap();
    let dispatcher = router.build();

    for id in ["0", "7", "0042", "987654321"] {
        let (outcome, response) = dispatcher.dispatch("GET", &format!("/users/{}", id)).unwrap();
        assert!(outcome.is_handled());
        assert_eq!(response.body_string(), format!("id={}", id));
    }

    for id in ["abc", "4a", "a4", "-1", "1.0"] {
        let (outcome, response) = dispatcher.dispatch("GET", &format!("/users/{}", id)).unwrap();
        assert!(outcome.is_not_found());
        assert_eq!(response.status(), 404);
    }
}

#[test]
fn segment_count_mismatch_never_matches() {
    let mut router = Router::new();
    router
        .get("/users/{id}/posts/{post}", echo_params(&["id", "post"]))
        .unwrap();
    let dispatcher = router.build();

    let (outcome, response) = dispatcher.dispatch("GET", "/users/1/posts/2").unwrap();
    assert!(outcome.is_handled());
    assert_eq!(response.body_string(), "id=1,post=2");

    for path in ["/users/1/posts", "/users/1/posts/2/3", "/users", "/"] {
        let (outcome, _) = dispatcher.dispatch("GET", path).unwrap();
        assert!(outcome.is_not_found(), "{} should not match", path);
    }
}

#[test]
fn nested_groups_do_not_leak_into_later_routes() {
    let mut router = Router::new();
    router
        .group("/y", vec![MiddlewareRef::named("outer")], |r| {
            r.group("/x", vec![MiddlewareRef::named("inner")], |r| {
                r.get("/a", HandlerRef::from_fn(|_req, _resp| {})).map(|_| ())
            })
        })
        .unwrap();
    router
        .get("/b", HandlerRef::from_fn(|_req, _resp| {}))
        .unwrap();

    let info = router.route_info();
    assert_eq!(info[0].path, "/y/x/a");
    assert_eq!(info[1].path, "/b");
    assert!(info[1].middleware.is_empty());
}

#[test]
fn middleware_halt_skips_rest_and_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let record = |name: &'static str, pass: bool| {
        let log = Arc::clone(&log);
        MiddlewareRef::from_fn(name, move |_req, _resp| {
            log.lock().unwrap().push(name);
            pass
        })
    };
    let handled = Arc::new(AtomicUsize::new(0));
    let not_found = Arc::new(AtomicUsize::new(0));

    let mut router = Router::new();
    router
        .get_with(
            "/guarded",
            counting(&handled, "secret"),
            vec![
                record("first", true),
                record("second", false),
                record("third", true),
            ],
        )
        .unwrap();
    router.add_404_handler(counting(&not_found, "missing"));
    let dispatcher = router.build();

    let (outcome, response) = dispatcher.dispatch("GET", "/guarded").unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Halted {
            middleware: "second".to_string()
        }
    );
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    assert_eq!(handled.load(Ordering::SeqCst), 0);
    assert_eq!(not_found.load(Ordering::SeqCst), 0);
    assert_eq!(response.status(), 200);
}

#[test]
fn route_value_beats_declared_default() {
    let mut router = Router::new();
    router
        .get(
            "/posts/{slug}",
            HandlerRef::callable(
                vec![
                    ParamSpec::text("slug").with_default("index"),
                    ParamSpec::text("page").with_default(1),
                ],
                |args, _req, resp| {
                    let page = args.by_name("page").and_then(Argument::as_default).cloned();
                    resp.set_json(&json!({ "slug": args.text("slug"), "page": page }))
                        .unwrap();
                },
            ),
        )
        .unwrap();
    let dispatcher = router.build();

    let (_, response) = dispatcher.dispatch("GET", "/posts/hello-world").unwrap();
    assert_eq!(response.body_string(), r#"{"page":1,"slug":"hello-world"}"#);
}

#[test]
fn unmatched_request_runs_not_found_handler_once() {
    let handled = Arc::new(AtomicUsize::new(0));
    let not_found = Arc::new(AtomicUsize::new(0));

    let mut router = Router::new();
    router.get("/users", counting(&handled, "users")).unwrap();
    router.post("/users", counting(&handled, "create")).unwrap();
    router.add_404_handler(counting(&not_found, "first 404"));
    router.add_404_handler(counting(&not_found, "custom 404"));
    let dispatcher = router.build();

    let (outcome, response) = dispatcher.dispatch("DELETE", "/users").unwrap();
    assert_eq!(outcome, DispatchOutcome::NotFound);
    assert_eq!(response.status(), 404);
    assert_eq!(response.body_string(), "custom 404");
    assert_eq!(not_found.load(Ordering::SeqCst), 1);
    assert_eq!(handled.load(Ordering::SeqCst), 0);

    dispatcher.dispatch("GET", "/nowhere").unwrap();
    assert_eq!(not_found.load(Ordering::SeqCst), 2);
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[test]
fn extension_methods_fall_through_to_not_found() {
    let handled = Arc::new(AtomicUsize::new(0));
    let not_found = Arc::new(AtomicUsize::new(0));

    let mut router = Router::new();
    router.get("/x", counting(&handled, "x")).unwrap();
    router.add_404_handler(counting(&not_found, "missing"));
    let dispatcher = router.build();

    for method in ["CONNECT", "PURGE"] {
        let (outcome, response) = dispatcher.dispatch(method, "/x").unwrap();
        assert_eq!(outcome, DispatchOutcome::NotFound);
        assert_eq!(response.status(), 404);
        assert_eq!(response.body_string(), "missing");
    }

    assert_eq!(not_found.load(Ordering::SeqCst), 2);
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[test]
fn shorthand_classes_follow_unicode_rules() {
    let mut router = Router::new();
    router.get("/users/{id:\\d+}", echo_params(&["id"])).unwrap();
    router.get("/orders/{id:[0-9]+}", echo_params(&["id"])).unwrap();
    let dispatcher = router.build();

    let (outcome, response) = dispatcher.dispatch("GET", "/users/\u{661}\u{662}\u{663}").unwrap();
    assert!(outcome.is_handled());
    assert_eq!(response.body_string(), "id=\u{661}\u{662}\u{663}");

    let (outcome, _) = dispatcher.dispatch("GET", "/orders/\u{661}\u{662}\u{663}").unwrap();
    assert!(outcome.is_not_found());
}

#[test]
fn numeric_route_tried_before_literal_sibling() {
    let mut router = Router::new();
    router.get("/users/{id:\\d+}", echo_params(&["id"])).unwrap();
    router
        .get(
            "/users/profile",
            HandlerRef::callable(vec![ParamSpec::text("id")], |args, req, resp| {
                assert!(req.route_params().is_empty());
                assert!(args.get(0).unwrap().is_absent());
                resp.set_text("profile");
            }),
        )
        .unwrap();
    let dispatcher = router.build();

    let (outcome, response) = dispatcher.dispatch("GET", "/users/profile").unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Handled {
            method: HttpMethod::GET,
            path: "/users/profile".to_string()
        }
    );
    assert_eq!(response.body_string(), "profile");
}

#[test]
fn group_middleware_blocks_handler() {
    let handled = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .group("/api", vec![MiddlewareRef::of::<DenyAll>()], |r| {
            r.get("/ping", counting(&handled, "pong")).map(|_| ())
        })
        .unwrap();
    let dispatcher = router.build();

    let (outcome, response) = dispatcher.dispatch("GET", "/api/ping").unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Halted {
            middleware: "DenyAll".to_string()
        }
    );
    assert_eq!(response.status(), 401);
    assert_eq!(response.body_string(), "Unauthorized");
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[test]
fn middleware_annotations_reach_handler() {
    let mut router = Router::new();
    router.alias_middleware("auth", MiddlewareRef::of::<RequireToken>());
    router
        .version(
            VersionGroup::new().middleware(MiddlewareRef::named("auth")),
            |r| {
                r.get(
                    "/me",
                    HandlerRef::from_fn(|req, resp| {
                        let user = req.attribute("user").cloned().unwrap_or_default();
                        resp.set_json(&json!({ "user": user })).unwrap();
                    }),
                )
                .map(|_| ())
            },
        )
        .unwrap();
    let dispatcher = router.build();

    let mut request = RequestContext::get("/api/v1/me").with_header("Authorization", "Bearer ada");
    let mut response = Response::new();
    let outcome = dispatcher.run(&mut request, &mut response).unwrap();
    assert!(outcome.is_handled());
    assert_eq!(response.body_string(), r#"{"user":"ada"}"#);

    let (outcome, response) = dispatcher.dispatch("GET", "/api/v1/me").unwrap();
    assert!(matches!(outcome, DispatchOutcome::Halted { .. }));
    assert_eq!(response.status(), 401);
}

#[test]
fn unknown_middleware_alias_is_fatal() {
    let handled = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .get_with(
            "/admin",
            counting(&handled, "admin"),
            vec![MiddlewareRef::named("missing")],
        )
        .unwrap();
    let dispatcher = router.build();

    let result = dispatcher.dispatch("GET", "/admin");
    assert!(matches!(
        result,
        Err(DispatchError::MiddlewareConstruction { ref middleware, .. }) if middleware == "missing"
    ));
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[test]
fn unregistered_action_is_invalid_handler() {
    let mut router = Router::new();
    router
        .get("/posts", HandlerRef::action("PostController@index"))
        .unwrap();
    router.get("/broken", HandlerRef::action("no-method")).unwrap();
    let dispatcher = router.build();

    assert!(matches!(
        dispatcher.dispatch("GET", "/posts"),
        Err(DispatchError::InvalidHandler { .. })
    ));
    assert!(matches!(
        dispatcher.dispatch("GET", "/broken"),
        Err(DispatchError::InvalidHandler { .. })
    ));
}

#[derive(Default)]
struct Counter {
    value: u32,
}

#[derive(Default)]
struct PostController {
    calls: u32,
}

impl PostController {
    fn show(&mut self, mut args: waypoint_http::Arguments, _req: &RequestContext, resp: &mut Response) {
        self.calls += 1;
        let counter = args.take::<Counter>("counter").unwrap_or_default();
        resp.set_json(&json!({
            "id": args.text("id"),
            "calls": self.calls,
            "counter": counter.value,
        }))
        .unwrap();
    }
}

#[test]
fn method_handlers_and_providers() {
    let mut router = Router::new();
    router.provide(|| Counter { value: 10 });
    router.register_action(
        "PostController@show",
        MethodRef::new::<PostController, _>(
            "show",
            vec![ParamSpec::text("id"), ParamSpec::service::<Counter>("counter")],
            PostController::show,
        ),
    );
    router
        .get("/posts/{id:\\d+}", HandlerRef::action("PostController@show"))
        .unwrap();
    router
        .get(
            "/drafts/{id}",
            MethodRef::new::<PostController, _>(
                "show",
                vec![ParamSpec::text("id"), ParamSpec::construct::<Counter>("counter")],
                PostController::show,
            )
            .into(),
        )
        .unwrap();
    let dispatcher = router.build();

    // A fresh controller per dispatch keeps `calls` at 1
    for _ in 0..2 {
        let (_, response) = dispatcher.dispatch("GET", "/posts/5").unwrap();
        assert_eq!(response.body_string(), r#"{"calls":1,"counter":10,"id":"5"}"#);
    }

    let (_, response) = dispatcher.dispatch("GET", "/drafts/intro").unwrap();
    assert_eq!(response.body_string(), r#"{"calls":1,"counter":0,"id":"intro"}"#);
}

#[test]
fn redirect_routes() {
    let mut router = Router::new();
    router.redirect("/old", "/new").unwrap();
    router.redirect_with_status("/moved", "/there", 301).unwrap();
    let dispatcher = router.build();

    let (_, response) = dispatcher.dispatch("GET", "/old").unwrap();
    assert_eq!(response.status(), 302);
    assert_eq!(response.header("location"), Some("/new"));

    let (_, response) = dispatcher.dispatch("GET", "/moved").unwrap();
    assert_eq!(response.status(), 301);
    assert_eq!(response.header("Location"), Some("/there"));

    let (outcome, _) = dispatcher.dispatch("POST", "/old").unwrap();
    assert!(outcome.is_not_found());
}

#[test]
fn query_string_is_ignored_for_matching() {
    let mut router = Router::new();
    router.get("/search/{term}", echo_params(&["term"])).unwrap();
    let dispatcher = router.build();

    let (outcome, response) = dispatcher
        .dispatch("get", "/search/rust%20lang?page=2")
        .unwrap();
    assert!(outcome.is_handled());
    assert_eq!(response.body_string(), "term=rust lang");
}

#[test]
fn invalid_templates_fail_at_registration() {
    let mut router = Router::new();
    assert!(matches!(
        router.get("/users/{id:[}", HandlerRef::from_fn(|_req, _resp| {})),
        Err(DispatchError::Pattern(_))
    ));
    assert!(router.route_info().is_empty());
}
