mod common;

use common::{executor, rest_registry, User, UserDirectory};
use http::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use viewroute::error::{DispatchStage, LifecycleError};
use viewroute::host::{BufferedContext, RequestContext};
use viewroute::lifecycle::{Lifecycle, RestLifecycle};
use viewroute::writer::{WriterRegistry, REST_RESULT_ATTRIBUTE};
use viewroute::DispatchConfig;

fn rest() -> RestLifecycle {
    RestLifecycle::new(
        Arc::new(rest_registry()),
        executor(UserDirectory::seeded()),
        Arc::new(WriterRegistry::standard()),
    )
}

fn run(lifecycle: &RestLifecycle, ctx: &mut BufferedContext) {
    lifecycle.execute(ctx).unwrap();
    lifecycle.render(ctx).unwrap();
}

#[test]
fn test_object_result_defaults_to_json() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::get("/users/42");
    run(&lifecycle, &mut ctx);

    assert_eq!(ctx.status(), 200);
    assert_eq!(ctx.response_content_type(), Some("application/json"));
    let user: User = serde_json::from_slice(ctx.response_body()).unwrap();
    assert_eq!(
        user,
        User {
            id: 42,
            name: "Ada".to_string()
        }
    );
}

#[test]
fn test_unknown_path_is_404_and_render_noop() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::get("/unknown");
    lifecycle.execute(&mut ctx).unwrap();

    assert_eq!(ctx.status(), 404);
    assert!(ctx.response_complete());
    let before = ctx.response_body().to_vec();
    lifecycle.render(&mut ctx).unwrap();
    lifecycle.render(&mut ctx).unwrap();
    assert_eq!(ctx.response_body(), before.as_slice());
    assert!(ctx.attribute(REST_RESULT_ATTRIBUTE).is_none());
}

#[test]
fn test_explicit_content_type_selects_writer() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::get("/users/42");
    lifecycle.execute(&mut ctx).unwrap();
    ctx.set_response_content_type("application/yaml");
    lifecycle.render(&mut ctx).unwrap();
    assert_eq!(ctx.response_text(), Some("id: 42\nname: Ada\n"));
}

#[test]
fn test_unregistered_content_type_uses_default_writer() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::get("/users/42");
    lifecycle.execute(&mut ctx).unwrap();
    ctx.set_response_content_type("application/hal+json");
    lifecycle.render(&mut ctx).unwrap();
    let body: Value = serde_json::from_slice(ctx.response_body()).unwrap();
    assert_eq!(body, json!({ "id": 42, "name": "Ada" }));
    assert_eq!(ctx.response_content_type(), Some("application/hal+json"));
}

#[test]
fn test_json_body_binding() {
    let lifecycle = rest();
    let mut ctx =
        BufferedContext::post("/users").with_json_body(&json!({ "id": 7, "name": "Grace" }));
    run(&lifecycle, &mut ctx);
    let body: Value = serde_json::from_slice(ctx.response_body()).unwrap();
    assert_eq!(body, json!({ "id": 7, "name": "Grace" }));
}

#[test]
fn test_optional_query_param() {
    let lifecycle = rest();

    let mut ctx = BufferedContext::get("/users/42/greeting?lang=fr");
    run(&lifecycle, &mut ctx);
    assert_eq!(ctx.response_text(), Some(r#""Bonjour, Ada""#));

    let mut ctx = BufferedContext::get("/users/42/greeting");
    run(&lifecycle, &mut ctx);
    assert_eq!(ctx.response_text(), Some(r#""Hello, Ada""#));
}

#[test]
fn test_handler_error_reply() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::get("/users/1");
    run(&lifecycle, &mut ctx);
    assert_eq!(ctx.status(), 404);
    assert_eq!(ctx.response_text(), Some(r#"{"error":"no such user"}"#));
}

#[test]
fn test_binding_failure_surfaces_as_dispatch_error() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::get("/users/abc");
    match lifecycle.execute(&mut ctx) {
        Err(LifecycleError::Dispatch(err)) => {
            assert_eq!(err.stage, DispatchStage::Binding);
            assert_eq!(err.handler, "get_user");
        }
        other => panic!("expected dispatch failure, got {other:?}"),
    }
}

#[test]
fn test_post_to_get_only_path_is_404() {
    let lifecycle = rest();
    let mut ctx = BufferedContext::new(Method::POST, "/users/42");
    lifecycle.execute(&mut ctx).unwrap();
    assert_eq!(ctx.status(), 404);
    assert!(ctx
        .response_text()
        .unwrap()
        .contains("Unable to match request"));
}

#[test]
fn test_configured_not_found_message() {
    let config = DispatchConfig {
        not_found_rest_message: "nothing here".to_string(),
        ..DispatchConfig::default()
    };
    let lifecycle = rest().with_config(&config);
    let mut ctx = BufferedContext::get("/nope");
    lifecycle.execute(&mut ctx).unwrap();
    assert_eq!(ctx.response_text(), Some(r#"{"error":"nothing here"}"#));
}

#[test]
fn test_shared_across_threads() {
    let lifecycle = Arc::new(rest());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lifecycle = Arc::clone(&lifecycle);
            std::thread::spawn(move || {
                let mut ctx = BufferedContext::get("/users/42");
                lifecycle.execute(&mut ctx).unwrap();
                lifecycle.render(&mut ctx).unwrap();
                ctx.response_body().to_vec()
            })
        })
        .collect();
    for handle in handles {
        let body: Value = serde_json::from_slice(&handle.join().unwrap()).unwrap();
        assert_eq!(body["id"], 42);
    }
}
