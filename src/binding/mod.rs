//! # Binding Module
//!
//! Produces handler arguments from the request.
//!
//! Each handler parameter carries a [`ParamBinding`]: where the value comes
//! from ([`ParamSource`]), under which name, and which [`ParamType`] the
//! handler expects. The [`ParameterProducer`] turns one binding into one
//! JSON argument value.
//!
//! | Source | Read from | Converted with |
//! |--------|-----------|----------------|
//! | `Path` | matched path variable | declared type |
//! | `Query` | query string | declared type |
//! | `Form` | url-encoded body field | declared type |
//! | `Header` | request header | declared type |
//! | `Body` | whole body (JSON or text) | shape check / declared type |
//!
//! Conversion never falls back silently: `"abc"` for an `I64` parameter or a
//! value outside the type's range is a [`crate::error::BindingError`].

mod convert;
mod core;
#[cfg(test)]
mod tests;

pub use convert::{check_value, convert_str};
pub use core::{DefaultParameterProducer, ParamBinding, ParamSource, ParamType, ParameterProducer};
