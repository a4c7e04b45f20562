use super::writers::{JsonResponseWriter, TextResponseWriter, YamlResponseWriter};
use crate::error::{ConfigError, WriteError};
use crate::host::RequestContext;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request attribute under which the REST lifecycle parks the handler result
pub const REST_RESULT_ATTRIBUTE: &str = "viewroute.rest.RestResult";

/// Serializes the stored handler result for one content type
pub trait ResponseWriter: Send + Sync {
    /// The single content type this writer produces
    fn content_type(&self) -> &str;

    /// Write the result stored under [`REST_RESULT_ATTRIBUTE`] to the response
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] when serialization or the host write fails
    fn write_response(&self, ctx: &mut dyn RequestContext) -> Result<(), WriteError>;
}

/// The stored result, or `null` when the execute phase stored nothing
#[must_use]
pub fn stored_result(ctx: &dyn RequestContext) -> Value {
    ctx.attribute(REST_RESULT_ATTRIBUTE)
        .cloned()
        .unwrap_or(Value::Null)
}

/// Builder for [`WriterRegistry`]
#[derive(Default)]
pub struct WriterRegistryBuilder {
    writers: HashMap<String, Arc<dyn ResponseWriter>>,
    default_writer: Option<Arc<dyn ResponseWriter>>,
}

impl WriterRegistryBuilder {
    /// Register a writer under its own content type
    ///
    /// A later writer for the same content type replaces the earlier one.
    #[must_use]
    pub fn register(mut self, writer: Arc<dyn ResponseWriter>) -> Self {
        let content_type = writer.content_type().to_string();
        if self.writers.insert(content_type.clone(), writer).is_some() {
            warn!(content_type = %content_type, "Replaced existing response writer");
        }
        self
    }

    /// Register a writer and mark it as the fallback for unknown content types
    #[must_use]
    pub fn default_writer(mut self, writer: Arc<dyn ResponseWriter>) -> Self {
        self.default_writer = Some(Arc::clone(&writer));
        self.register(writer)
    }

    #[must_use]
    pub fn build(self) -> WriterRegistry {
        let mut content_types: Vec<&str> = self.writers.keys().map(String::as_str).collect();
        content_types.sort_unstable();
        info!(
            writers_count = self.writers.len(),
            content_types = ?content_types,
            default_writer = self.default_writer.as_ref().map(|w| w.content_type()),
            "Response writer registry loaded"
        );
        WriterRegistry {
            writers: self.writers,
            default_writer: self.default_writer,
        }
    }
}

/// Content-type → writer table, read-only after startup
///
/// Selection is an exact string comparison on the content type. When nothing
/// matches, the designated default writer is used; without one, selection
/// fails with [`ConfigError::NoResponseWriter`].
#[derive(Clone, Default)]
pub struct WriterRegistry {
    writers: HashMap<String, Arc<dyn ResponseWriter>>,
    default_writer: Option<Arc<dyn ResponseWriter>>,
}

impl WriterRegistry {
    #[must_use]
    pub fn builder() -> WriterRegistryBuilder {
        WriterRegistryBuilder::default()
    }

    /// JSON (default), YAML and plain text writers
    #[must_use]
    pub fn standard() -> Self {
        Self::builder()
            .default_writer(Arc::new(JsonResponseWriter))
            .register(Arc::new(YamlResponseWriter))
            .register(Arc::new(TextResponseWriter))
            .build()
    }

    /// Pick the writer for `content_type`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoResponseWriter`] when neither an exact match
    /// nor a default writer exists
    pub fn select(&self, content_type: &str) -> Result<Arc<dyn ResponseWriter>, ConfigError> {
        if let Some(writer) = self.writers.get(content_type) {
            debug!(content_type, "Response writer selected");
            return Ok(Arc::clone(writer));
        }
        match &self.default_writer {
            Some(writer) => {
                debug!(
                    content_type,
                    fallback = writer.content_type(),
                    "No exact response writer, using default"
                );
                Ok(Arc::clone(writer))
            }
            None => Err(ConfigError::NoResponseWriter {
                content_type: content_type.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut content_types: Vec<&String> = self.writers.keys().collect();
        content_types.sort_unstable();
        f.debug_struct("WriterRegistry")
            .field("content_types", &content_types)
            .field(
                "default_writer",
                &self.default_writer.as_ref().map(|w| w.content_type()),
            )
            .finish()
    }
}
