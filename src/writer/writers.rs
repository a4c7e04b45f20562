//! Built-in response writers.

use super::core::{stored_result, ResponseWriter};
use crate::error::WriteError;
use crate::host::RequestContext;
use serde_json::Value;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_YAML: &str = "application/yaml";
pub const TEXT_PLAIN: &str = "text/plain";

fn write_bytes(
    ctx: &mut dyn RequestContext,
    content_type: &str,
    bytes: &[u8],
) -> Result<(), WriteError> {
    if ctx.response_content_type().is_none() {
        ctx.set_response_content_type(content_type);
    }
    ctx.write_body(bytes)
        .map_err(|e| WriteError::new(content_type, e))
}

/// `application/json` via serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseWriter;

impl ResponseWriter for JsonResponseWriter {
    fn content_type(&self) -> &str {
        APPLICATION_JSON
    }

    fn write_response(&self, ctx: &mut dyn RequestContext) -> Result<(), WriteError> {
        let bytes = serde_json::to_vec(&stored_result(ctx))
            .map_err(|e| WriteError::new(APPLICATION_JSON, e))?;
        write_bytes(ctx, APPLICATION_JSON, &bytes)
    }
}

/// `application/yaml` via serde_yaml
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlResponseWriter;

impl ResponseWriter for YamlResponseWriter {
    fn content_type(&self) -> &str {
        APPLICATION_YAML
    }

    fn write_response(&self, ctx: &mut dyn RequestContext) -> Result<(), WriteError> {
        let text = serde_yaml::to_string(&stored_result(ctx))
            .map_err(|e| WriteError::new(APPLICATION_YAML, e))?;
        write_bytes(ctx, APPLICATION_YAML, text.as_bytes())
    }
}

/// `text/plain`: strings verbatim, anything else as compact JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct TextResponseWriter;

impl ResponseWriter for TextResponseWriter {
    fn content_type(&self) -> &str {
        TEXT_PLAIN
    }

    fn write_response(&self, ctx: &mut dyn RequestContext) -> Result<(), WriteError> {
        let text = match stored_result(ctx) {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        write_bytes(ctx, TEXT_PLAIN, text.as_bytes())
    }
}
