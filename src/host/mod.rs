//! # Host Module
//!
//! Interfaces to the surrounding page-rendering runtime.
//!
//! The dispatch pipeline does not own the request lifecycle. The host runtime
//! calls `execute` and `render` once per request and provides:
//!
//! - a [`RequestContext`] for reading the request and shaping the response
//! - a [`BeanProvider`] that hands out handler instances
//! - its own default lifecycle (see [`crate::lifecycle::LifecycleFactory`])
//!
//! [`BufferedContext`] is a complete in-memory [`RequestContext`] with a
//! buffered response body. It is what the tests and offline tooling run
//! against.

mod beans;
mod buffered;
mod context;

pub use beans::{Bean, BeanProvider, BeanRegistry, BeanType};
pub use buffered::{parse_query_params, BufferedContext};
pub use context::RequestContext;
