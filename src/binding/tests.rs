use super::*;
use crate::error::{BindingError, BindingErrorKind};
use crate::handler::{HandlerMethod, Reply};
use crate::host::BufferedContext;
use crate::router::{MappingMatch, MappingRegistry};
use http::Method;
use serde_json::{json, Value};

struct Bean;

fn match_for(pattern: &str, path: &str) -> MappingMatch {
    let handler = HandlerMethod::new::<Bean, _>("h", Vec::new(), |_, _| Ok(Reply::Empty));
    MappingRegistry::builder()
        .any(pattern, handler)
        .unwrap()
        .build()
        .route(&Method::GET, path)
        .unwrap()
}

fn produce(ctx: &BufferedContext, matched: &MappingMatch, param: ParamBinding) -> Result<Value, BindingError> {
    DefaultParameterProducer::new().produce(ctx, matched, &param)
}

#[test]
fn test_path_variable_to_integer() {
    let ctx = BufferedContext::get("/users/42");
    let matched = match_for("/users/{id}", "/users/42");
    let value = produce(&ctx, &matched, ParamBinding::path("id", ParamType::I32)).unwrap();
    assert_eq!(value, json!(42));
}

#[test]
fn test_integer_out_of_range() {
    let ctx = BufferedContext::get("/n/300");
    let matched = match_for("/n/{n}", "/n/300");
    let err = produce(&ctx, &matched, ParamBinding::path("n", ParamType::U8)).unwrap_err();
    assert_eq!(err, BindingError::conversion("n", "300", "u8"));
}

#[test]
fn test_query_bool_and_float() {
    let ctx = BufferedContext::get("/s?debug=TRUE&ratio=0.5&flag=0");
    let matched = match_for("/s", "/s");
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::query("debug", ParamType::Bool)).unwrap(),
        json!(true)
    );
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::query("flag", ParamType::Bool)).unwrap(),
        json!(false)
    );
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::query("ratio", ParamType::F64)).unwrap(),
        json!(0.5)
    );
}

#[test]
fn test_missing_required_and_optional() {
    let ctx = BufferedContext::get("/s");
    let matched = match_for("/s", "/s");
    let err = produce(&ctx, &matched, ParamBinding::query("limit", ParamType::U32)).unwrap_err();
    assert_eq!(err.kind, BindingErrorKind::Missing);
    let value = produce(
        &ctx,
        &matched,
        ParamBinding::query("limit", ParamType::U32).optional(),
    )
    .unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn test_unsupported_type_fails_even_when_absent() {
    let ctx = BufferedContext::get("/s");
    let matched = match_for("/s", "/s");
    let err = produce(
        &ctx,
        &matched,
        ParamBinding::query("when", ParamType::Unsupported("SystemTime")).optional(),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        BindingErrorKind::Unsupported {
            target: "SystemTime"
        }
    );
}

#[test]
fn test_form_and_header_sources() {
    let ctx = BufferedContext::post("/login")
        .with_header("X-Tenant", "7")
        .with_form_body(&[("user", "ana")]);
    let matched = match_for("/login", "/login");
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::form("user", ParamType::String)).unwrap(),
        json!("ana")
    );
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::header("x-tenant", ParamType::U16)).unwrap(),
        json!(7)
    );
}

#[test]
fn test_json_body() {
    let ctx = BufferedContext::post("/pets").with_json_body(&json!({ "name": "Rex" }));
    let matched = match_for("/pets", "/pets");
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::body(ParamType::Json)).unwrap(),
        json!({ "name": "Rex" })
    );
    let err = produce(&ctx, &matched, ParamBinding::body(ParamType::I64)).unwrap_err();
    assert!(matches!(err.kind, BindingErrorKind::Conversion { .. }));
}

#[test]
fn test_malformed_json_body() {
    let ctx = BufferedContext::post("/pets").with_body("application/json", "{not json");
    let matched = match_for("/pets", "/pets");
    let err = produce(&ctx, &matched, ParamBinding::body(ParamType::Json)).unwrap_err();
    assert!(matches!(err.kind, BindingErrorKind::MalformedBody { .. }));
}

#[test]
fn test_text_body_converted() {
    let ctx = BufferedContext::post("/count").with_body("text/plain", "12");
    let matched = match_for("/count", "/count");
    assert_eq!(
        produce(&ctx, &matched, ParamBinding::body(ParamType::U64)).unwrap(),
        json!(12)
    );
}

#[test]
fn test_empty_body_is_missing() {
    let ctx = BufferedContext::post("/pets").with_body("application/json", "");
    let matched = match_for("/pets", "/pets");
    let err = produce(&ctx, &matched, ParamBinding::body(ParamType::Json)).unwrap_err();
    assert_eq!(err.kind, BindingErrorKind::Missing);
}

#[test]
fn test_char_conversion() {
    assert_eq!(convert_str("c", "x", &ParamType::Char).unwrap(), json!("x"));
    assert!(convert_str("c", "xy", &ParamType::Char).is_err());
}

#[test]
fn test_check_value_accepts_numeric_strings() {
    assert_eq!(check_value("n", json!("5"), &ParamType::I8).unwrap(), json!(5));
    assert_eq!(check_value("s", json!(5), &ParamType::String).unwrap(), json!("5"));
    assert!(check_value("b", json!(1), &ParamType::Bool).is_err());
    assert_eq!(check_value("n", json!("42"), &ParamType::I64).unwrap(), json!(42));
    assert!(check_value("n", json!([1]), &ParamType::I64).is_err());
}
