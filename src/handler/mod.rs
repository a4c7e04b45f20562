//! # Handler Module
//!
//! Statically declared handler methods.
//!
//! A [`HandlerMethod`] pairs an owning bean type with an ordered list of
//! parameter bindings and an invoker closure. The closure receives the bean
//! resolved for the request and the positional [`Arguments`], and returns a
//! [`Reply`]. Everything is fixed at registration time; nothing is inspected
//! per request.

mod core;

pub use core::{Arguments, HandlerMethod, Invoker, Reply};
