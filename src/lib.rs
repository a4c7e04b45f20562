//! # viewroute
//!
//! **viewroute** is the request-dispatch core of an action-based web layer. It
//! plugs into a host page-rendering runtime and decides, per request, which
//! handler method runs, how its arguments are produced from the request, and
//! how its result reaches the response.
//!
//! ## Overview
//!
//! Two dispatch pipelines are provided, both following the host's two-phase
//! `execute` / `render` contract:
//!
//! - **Action** ([`lifecycle::ActionLifecycle`]): the handler picks the next
//!   view; rendering is left to the host's default lifecycle
//! - **REST** ([`lifecycle::RestLifecycle`]): the handler result is serialized
//!   by a [`writer::ResponseWriter`] chosen from the response content type
//!
//! ## Architecture
//!
//! - **[`host`]** - Interfaces the host provides: request context, bean provider
//! - **[`handler`]** - Statically declared handler methods, arguments and replies
//! - **[`router`]** - Mapping registry and path/verb matcher
//! - **[`binding`]** - Parameter producer: request data → typed argument values
//! - **[`executor`]** - Resolves the bean, binds arguments, invokes the handler
//! - **[`writer`]** - Content-type keyed response writers
//! - **[`lifecycle`]** - The action and REST lifecycles and the lifecycle factory
//! - **[`config`]** - Dispatch settings from YAML and environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`error`]** - Error types surfaced to the host
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Lifecycle
//!     participant Registry as MappingRegistry
//!     participant Executor as MethodExecutor
//!     participant Producer as ParameterProducer
//!     participant Handler
//!     participant Writers as WriterRegistry
//!
//!     Host->>Lifecycle: execute(ctx)
//!     Lifecycle->>Registry: match_request(ctx)
//!     alt No mapping
//!         Registry-->>Lifecycle: None
//!         Lifecycle-->>Host: 404, response complete
//!     end
//!     Registry-->>Lifecycle: MappingMatch (handler, path vars)
//!     Lifecycle->>Executor: execute(ctx, match)
//!     Executor->>Executor: resolve bean
//!     loop each declared parameter
//!         Executor->>Producer: produce(ctx, match, param)
//!     end
//!     Executor->>Handler: invoke(bean, args)
//!     Handler-->>Lifecycle: Reply
//!     Lifecycle->>Lifecycle: view id (Action) / store result (REST)
//!
//!     Host->>Lifecycle: render(ctx)
//!     alt Action
//!         Lifecycle->>Host: default lifecycle render(ctx)
//!     else REST
//!         Lifecycle->>Writers: select(content type)
//!         Writers-->>Lifecycle: ResponseWriter
//!         Lifecycle->>Lifecycle: write_response(ctx)
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use serde_json::json;
//! use viewroute::binding::{DefaultParameterProducer, ParamBinding, ParamType};
//! use viewroute::executor::DefaultMethodExecutor;
//! use viewroute::handler::{HandlerMethod, Reply};
//! use viewroute::host::{BeanRegistry, BufferedContext};
//! use viewroute::lifecycle::{Lifecycle, RestLifecycle};
//! use viewroute::router::MappingRegistry;
//! use viewroute::writer::WriterRegistry;
//!
//! struct Users;
//!
//! let registry = MappingRegistry::builder()
//!     .route(
//!         Method::GET,
//!         "/users/{id}",
//!         HandlerMethod::new::<Users, _>(
//!             "get_user",
//!             vec![ParamBinding::path("id", ParamType::I64)],
//!             |_, args| Ok(Reply::Body(json!({ "id": args.get::<i64>(0)? }))),
//!         ),
//!     )
//!     .unwrap()
//!     .build();
//!
//! let mut beans = BeanRegistry::new();
//! beans.insert(Users);
//! let executor = DefaultMethodExecutor::new(Arc::new(DefaultParameterProducer), Arc::new(beans));
//! let rest = RestLifecycle::new(
//!     Arc::new(registry),
//!     Arc::new(executor),
//!     Arc::new(WriterRegistry::standard()),
//! );
//!
//! let mut ctx = BufferedContext::get("/users/42");
//! rest.execute(&mut ctx).unwrap();
//! rest.render(&mut ctx).unwrap();
//! assert_eq!(ctx.response_text(), Some(r#"{"id":42}"#));
//! ```
//!
//! ## Threading
//!
//! Everything runs synchronously on the caller's thread. The mapping and
//! writer registries are built once at startup and only read afterwards; all
//! per-request state lives in the request context.

pub mod binding;
pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod router;
pub mod writer;

pub use config::DispatchConfig;
pub use error::{
    BindingError, ConfigError, DispatchError, DispatchStage, HostError, LifecycleError, WriteError,
};
pub use lifecycle::{ActionLifecycle, Lifecycle, LifecycleFactory, RestLifecycle};
pub use router::{Mapping, MappingMatch, MappingRegistry};
