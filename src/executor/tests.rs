use super::*;
use crate::binding::{DefaultParameterProducer, ParamBinding, ParamType, ParameterProducer};
use crate::error::{BindingError, DispatchStage};
use crate::handler::{HandlerMethod, Reply};
use crate::host::{BeanRegistry, BufferedContext, RequestContext};
use crate::router::{MappingMatch, MappingRegistry};
use http::Method;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct Calculator;

#[derive(Default)]
struct RecordingProducer {
    seen: Mutex<Vec<String>>,
}

impl ParameterProducer for RecordingProducer {
    fn produce(
        &self,
        ctx: &dyn RequestContext,
        matched: &MappingMatch,
        param: &ParamBinding,
    ) -> Result<Value, BindingError> {
        self.seen.lock().unwrap().push(param.name.clone());
        DefaultParameterProducer.produce(ctx, matched, param)
    }
}

fn add_method() -> HandlerMethod {
    HandlerMethod::new::<Calculator, _>(
        "add",
        vec![
            ParamBinding::path("a", ParamType::I64),
            ParamBinding::path("b", ParamType::I64),
            ParamBinding::query("scale", ParamType::I64).optional(),
        ],
        |_, args| {
            let a: i64 = args.get(0)?;
            let b: i64 = args.get(1)?;
            let scale: Option<i64> = args.get(2)?;
            Ok(Reply::Body(json!((a + b) * scale.unwrap_or(1))))
        },
    )
}

fn matched(method: HandlerMethod, pattern: &str, path: &str) -> MappingMatch {
    MappingRegistry::builder()
        .any(pattern, method)
        .unwrap()
        .build()
        .route(&Method::GET, path)
        .unwrap()
}

fn beans() -> Arc<BeanRegistry> {
    let mut beans = BeanRegistry::new();
    beans.insert(Calculator);
    Arc::new(beans)
}

#[test]
fn test_producer_called_once_per_param_in_order() {
    let producer = Arc::new(RecordingProducer::default());
    let executor = DefaultMethodExecutor::new(Arc::clone(&producer) as Arc<dyn ParameterProducer>, beans());
    let ctx = BufferedContext::get("/add/2/3?scale=10");
    let m = matched(add_method(), "/add/{a}/{b}", "/add/2/3");

    let reply = executor.execute(&ctx, &m).unwrap();
    assert_eq!(reply, Reply::Body(json!(50)));
    assert_eq!(*producer.seen.lock().unwrap(), vec!["a", "b", "scale"]);
}

#[test]
fn test_resolution_failure() {
    let executor = DefaultMethodExecutor::new(
        Arc::new(DefaultParameterProducer),
        Arc::new(BeanRegistry::new()),
    );
    let ctx = BufferedContext::get("/add/2/3");
    let m = matched(add_method(), "/add/{a}/{b}", "/add/2/3");
    let err = executor.execute(&ctx, &m).unwrap_err();
    assert_eq!(err.stage, DispatchStage::Resolution);
    assert_eq!(err.handler, "add");
}

#[test]
fn test_binding_failure_stops_before_invoke() {
    let producer = Arc::new(RecordingProducer::default());
    let executor = DefaultMethodExecutor::new(Arc::clone(&producer) as Arc<dyn ParameterProducer>, beans());
    let ctx = BufferedContext::get("/add/x/3");
    let m = matched(add_method(), "/add/{a}/{b}", "/add/x/3");
    let err = executor.execute(&ctx, &m).unwrap_err();
    assert_eq!(err.stage, DispatchStage::Binding);
    assert_eq!(
        err.cause_as::<BindingError>(),
        Some(&BindingError::conversion("a", "x", "i64"))
    );
    assert_eq!(*producer.seen.lock().unwrap(), vec!["a"]);
}

#[derive(Debug)]
struct Overdrawn;

impl std::fmt::Display for Overdrawn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account overdrawn")
    }
}

impl std::error::Error for Overdrawn {}

#[test]
fn test_handler_error_cause_preserved() {
    let failing = HandlerMethod::new::<Calculator, _>("withdraw", Vec::new(), |_, _| {
        Err(Overdrawn.into())
    });
    let executor = DefaultMethodExecutor::new(Arc::new(DefaultParameterProducer), beans());
    let ctx = BufferedContext::get("/withdraw");
    let err = executor
        .execute(&ctx, &matched(failing, "/withdraw", "/withdraw"))
        .unwrap_err();
    assert_eq!(err.stage, DispatchStage::Invocation);
    assert!(err.cause_as::<Overdrawn>().is_some());
    assert!(err.to_string().contains("account overdrawn"));
}

#[test]
fn test_handler_panic_is_invocation_failure() {
    let panicking = HandlerMethod::new::<Calculator, _>("boom", Vec::new(), |_, _| {
        panic!("kaboom");
    });
    let executor = DefaultMethodExecutor::new(Arc::new(DefaultParameterProducer), beans());
    let ctx = BufferedContext::get("/boom");
    let err = executor
        .execute(&ctx, &matched(panicking, "/boom", "/boom"))
        .unwrap_err();
    assert_eq!(err.stage, DispatchStage::Invocation);
    assert!(err.cause.to_string().contains("kaboom"));
}
