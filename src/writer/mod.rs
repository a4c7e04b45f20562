//! # Writer Module
//!
//! Content negotiation for the REST lifecycle.
//!
//! A [`ResponseWriter`] serializes the handler result stored for the current
//! request under [`REST_RESULT_ATTRIBUTE`]. The [`WriterRegistry`] maps
//! content types to writers and names one of them as the default.
//!
//! ```rust
//! use viewroute::writer::WriterRegistry;
//!
//! let writers = WriterRegistry::standard();
//! assert_eq!(writers.select("application/yaml").unwrap().content_type(), "application/yaml");
//! // Unknown content types fall back to the default (JSON) writer
//! assert_eq!(writers.select("text/csv").unwrap().content_type(), "application/json");
//! ```

mod core;
mod writers;

pub use core::{
    stored_result, ResponseWriter, WriterRegistry, WriterRegistryBuilder, REST_RESULT_ATTRIBUTE,
};
pub use writers::{
    JsonResponseWriter, TextResponseWriter, YamlResponseWriter, APPLICATION_JSON,
    APPLICATION_YAML, TEXT_PLAIN,
};
