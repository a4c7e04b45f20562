#![allow(dead_code)]

//! Shared fixtures for the integration tests: a small user directory
//! application wired into both lifecycles.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use viewroute::binding::{DefaultParameterProducer, ParamBinding, ParamType};
use viewroute::error::LifecycleError;
use viewroute::executor::{DefaultMethodExecutor, MethodExecutor};
use viewroute::handler::{HandlerMethod, Reply};
use viewroute::host::{BeanRegistry, RequestContext};
use viewroute::lifecycle::{Lifecycle, PhaseListener};
use viewroute::router::MappingRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// In-memory user store used as the handler bean
#[derive(Default)]
pub struct UserDirectory {
    users: Mutex<BTreeMap<i64, User>>,
}

impl UserDirectory {
    pub fn seeded() -> Self {
        let directory = Self::default();
        directory.put(User {
            id: 42,
            name: "Ada".to_string(),
        });
        directory
    }

    pub fn put(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

pub fn executor(directory: UserDirectory) -> Arc<dyn MethodExecutor> {
    let mut beans = BeanRegistry::new();
    beans.insert(directory);
    Arc::new(DefaultMethodExecutor::new(
        Arc::new(DefaultParameterProducer),
        Arc::new(beans),
    ))
}

pub fn rest_registry() -> MappingRegistry {
    MappingRegistry::builder()
        .route(
            Method::GET,
            "/users/{id}",
            HandlerMethod::new::<UserDirectory, _>(
                "get_user",
                vec![ParamBinding::path("id", ParamType::I64)],
                |dir, args| {
                    let id: i64 = args.get(0)?;
                    match dir.get(id) {
                        Some(user) => Reply::json(&user),
                        None => Ok(Reply::error(404, "no such user")),
                    }
                },
            ),
        )
        .unwrap()
        .route(
            Method::POST,
            "/users",
            HandlerMethod::new::<UserDirectory, _>(
                "create_user",
                vec![ParamBinding::body(ParamType::Json)],
                |dir, args| {
                    let user: User = args.get(0)?;
                    dir.put(user.clone());
                    Reply::json(&user)
                },
            ),
        )
        .unwrap()
        .route(
            Method::GET,
            "/users/{id}/greeting",
            HandlerMethod::new::<UserDirectory, _>(
                "greeting",
                vec![
                    ParamBinding::path("id", ParamType::I64),
                    ParamBinding::query("lang", ParamType::String).optional(),
                ],
                |dir, args| {
                    let id: i64 = args.get(0)?;
                    let lang: Option<String> = args.get_opt(1)?;
                    let name = dir.get(id).map(|u| u.name).unwrap_or_default();
                    let hello = match lang.as_deref() {
                        Some("fr") => "Bonjour",
                        _ => "Hello",
                    };
                    Ok(Reply::Body(json!(format!("{hello}, {name}"))))
                },
            ),
        )
        .unwrap()
        .build()
}

pub fn action_registry() -> MappingRegistry {
    MappingRegistry::builder()
        .any(
            "/a/{x}",
            HandlerMethod::new::<UserDirectory, _>(
                "variable",
                vec![ParamBinding::path("x", ParamType::String)],
                |_, args| Ok(Reply::View(format!("/variable-{}.xhtml", args.get::<String>(0)?))),
            ),
        )
        .unwrap()
        .any(
            "/a/fixed",
            HandlerMethod::new::<UserDirectory, _>("fixed", Vec::new(), |_, _| {
                Ok(Reply::view("/fixed.xhtml"))
            }),
        )
        .unwrap()
        .build()
}

/// Stand-in for the host's own lifecycle: renders the selected view id
#[derive(Default)]
pub struct HostLifecycle {
    pub renders: AtomicUsize,
}

impl HostLifecycle {
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl Lifecycle for HostLifecycle {
    fn execute(&self, _ctx: &mut dyn RequestContext) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn render(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let page = format!("<html>{}</html>", ctx.view_id().unwrap_or(""));
        ctx.set_response_content_type("text/html");
        ctx.write_body(page.as_bytes())?;
        Ok(())
    }

    fn add_phase_listener(&self, _listener: Arc<dyn PhaseListener>) {}

    fn remove_phase_listener(&self, _listener: &Arc<dyn PhaseListener>) {}

    fn phase_listeners(&self) -> Vec<Arc<dyn PhaseListener>> {
        Vec::new()
    }
}
