//! # Router Module
//!
//! The router module holds the mapping registry and the matcher that decides
//! whether a request belongs to the dispatch pipeline at all.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling registered path patterns (`/users/{id}`) once at startup
//! - Matching incoming requests to exactly one mapping
//! - Extracting path variables from the matched request path
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: At startup, patterns are split into literal and
//!    variable segments and indexed by segment count.
//!
//! 2. **Matching**: For each request, the normalized path is compared with
//!    the patterns of the same length. The most literal pattern wins; ties
//!    go to the first registration.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use viewroute::binding::{ParamBinding, ParamType};
//! use viewroute::handler::{HandlerMethod, Reply};
//! use viewroute::router::MappingRegistry;
//!
//! struct Users;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let get_user = HandlerMethod::new::<Users, _>(
//!     "get_user",
//!     vec![ParamBinding::path("id", ParamType::I64)],
//!     |_, args| Ok(Reply::Body(args.get::<serde_json::Value>(0)?)),
//! );
//! let registry = MappingRegistry::builder()
//!     .route(Method::GET, "/users/{id}", get_user)?
//!     .build();
//!
//! let matched = registry.route(&Method::GET, "/users/42").expect("matches");
//! assert_eq!(matched.path_var("id"), Some("42"));
//! assert!(registry.route(&Method::POST, "/users/42").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! A built [`MappingRegistry`] is immutable. Share it behind an `Arc` and
//! match from any number of threads without locking.

mod core;
mod pattern;

pub use core::{
    Mapping, MappingMatch, MappingRegistry, MappingRegistryBuilder, ParamVec, MAX_INLINE_PARAMS,
};
pub use pattern::{normalize_path, PathPattern, Segment, SegmentVec};
