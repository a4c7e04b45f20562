//! # Lifecycle Module
//!
//! The two dispatch pipelines the host calls once per request.
//!
//! ## Request Flow
//!
//! ```text
//! execute(ctx)
//!   ├─ no mapping  → send_error(404), mark complete        (render is a no-op)
//!   └─ mapping     → MethodExecutor::execute
//!                     ├─ Action: View(id) → set_view_id
//!                     └─ REST:   result   → REST_RESULT_ATTRIBUTE
//! render(ctx)
//!   ├─ complete    → nothing
//!   ├─ Action      → default lifecycle's render
//!   └─ REST        → content type (default application/json) → writer → body
//! ```
//!
//! Both variants take and ignore phase listeners. Dispatch failures are never
//! swallowed; they come back to the host as [`crate::error::LifecycleError`].
//!
//! The [`LifecycleFactory`] is where startup code finds the host's default
//! lifecycle (needed by [`ActionLifecycle`]) and registers the dispatch
//! lifecycles under [`ACTION_LIFECYCLE_ID`] and [`REST_LIFECYCLE_ID`].

mod action;
mod core;
mod rest;

pub use action::{ActionLifecycle, ACTION_RESULT_ATTRIBUTE};
pub use core::{
    Lifecycle, LifecycleFactory, PhaseId, PhaseListener, ACTION_LIFECYCLE_ID,
    DEFAULT_LIFECYCLE_ID, REST_LIFECYCLE_ID,
};
pub use rest::RestLifecycle;
