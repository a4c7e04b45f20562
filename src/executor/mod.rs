//! # Executor Module
//!
//! Runs the handler behind a matched mapping.
//!
//! ## Steps
//!
//! 1. Resolve a handler instance for the mapping's bean type from the
//!    [`crate::host::BeanProvider`]
//! 2. Call the [`crate::binding::ParameterProducer`] once per declared
//!    parameter, in order, to build the positional arguments
//! 3. Invoke the handler method
//!
//! Whatever fails in these steps (an unknown bean, a missing parameter, an
//! error returned by the handler or a panic inside it) is reported as a
//! single [`crate::error::DispatchError`] that records the failing stage and
//! keeps the original cause.

mod core;
#[cfg(test)]
mod tests;

pub use core::{DefaultMethodExecutor, MethodExecutor};
