use super::convert::{check_value, convert_str};
use crate::error::BindingError;
use crate::host::RequestContext;
use crate::router::MappingMatch;
use serde_json::Value;
use tracing::debug;

/// Where a parameter's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// A `{name}` variable of the matched path pattern
    Path,
    /// A query string parameter
    Query,
    /// A field of a url-encoded form body
    Form,
    /// A request header
    Header,
    /// The whole request body
    Body,
}

impl std::fmt::Display for ParamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParamSource::Path => "Path",
            ParamSource::Query => "Query",
            ParamSource::Form => "Form",
            ParamSource::Header => "Header",
            ParamSource::Body => "Body",
        };
        write!(f, "{}", s)
    }
}

/// Declared type of a handler parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    /// Any JSON value, typically a deserialized body
    Json,
    /// A type no request source can produce; binding it always fails
    Unsupported(&'static str),
}

impl ParamType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Bool => "bool",
            ParamType::I8 => "i8",
            ParamType::I16 => "i16",
            ParamType::I32 => "i32",
            ParamType::I64 => "i64",
            ParamType::U8 => "u8",
            ParamType::U16 => "u16",
            ParamType::U32 => "u32",
            ParamType::U64 => "u64",
            ParamType::F32 => "f32",
            ParamType::F64 => "f64",
            ParamType::Char => "char",
            ParamType::String => "String",
            ParamType::Json => "json",
            ParamType::Unsupported(name) => *name,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ParamType::I8
                | ParamType::I16
                | ParamType::I32
                | ParamType::I64
                | ParamType::U8
                | ParamType::U16
                | ParamType::U32
                | ParamType::U64
                | ParamType::F32
                | ParamType::F64
        )
    }
}

/// Binding descriptor for one handler parameter
///
/// Declared once at registration; replaces per-request annotation lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBinding {
    pub source: ParamSource,
    /// Variable, parameter, field or header name (ignored for `Body`)
    pub name: String,
    pub ty: ParamType,
    /// Missing required values fail binding; missing optional ones bind `null`
    pub required: bool,
}

impl ParamBinding {
    #[must_use]
    pub fn new(source: ParamSource, name: &str, ty: ParamType) -> Self {
        Self {
            source,
            name: name.to_string(),
            ty,
            required: true,
        }
    }

    #[must_use]
    pub fn path(name: &str, ty: ParamType) -> Self {
        Self::new(ParamSource::Path, name, ty)
    }

    #[must_use]
    pub fn query(name: &str, ty: ParamType) -> Self {
        Self::new(ParamSource::Query, name, ty)
    }

    #[must_use]
    pub fn form(name: &str, ty: ParamType) -> Self {
        Self::new(ParamSource::Form, name, ty)
    }

    #[must_use]
    pub fn header(name: &str, ty: ParamType) -> Self {
        Self::new(ParamSource::Header, name, ty)
    }

    #[must_use]
    pub fn body(ty: ParamType) -> Self {
        Self::new(ParamSource::Body, "body", ty)
    }

    /// Bind `null` instead of failing when the value is absent
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Produces one handler argument from the current request
///
/// Called once per declared parameter, in declaration order. Must not
/// mutate the request or the match.
pub trait ParameterProducer: Send + Sync {
    /// Produce the value for `param`
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the value is missing or cannot be
    /// converted to the declared type
    fn produce(
        &self,
        ctx: &dyn RequestContext,
        matched: &MappingMatch,
        param: &ParamBinding,
    ) -> Result<Value, BindingError>;
}

/// Stock producer covering path, query, form, header and body sources
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParameterProducer;

impl DefaultParameterProducer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn produce_body(
        &self,
        ctx: &dyn RequestContext,
        param: &ParamBinding,
    ) -> Result<Option<Value>, BindingError> {
        let Some(bytes) = ctx.body().filter(|b| !b.is_empty()) else {
            return Ok(None);
        };
        let is_json = ctx
            .request_content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| {
                let ct = ct.trim().to_ascii_lowercase();
                ct == "application/json" || ct.ends_with("+json")
            })
            // Bodies without a content type are tried as JSON
            .unwrap_or(true);

        if is_json {
            let decoded: Value = serde_json::from_slice(bytes)
                .map_err(|e| BindingError::malformed_body(&param.name, e.to_string()))?;
            return check_value(&param.name, decoded, &param.ty).map(Some);
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|e| BindingError::malformed_body(&param.name, e.to_string()))?;
        convert_str(&param.name, text, &param.ty).map(Some)
    }
}

impl ParameterProducer for DefaultParameterProducer {
    fn produce(
        &self,
        ctx: &dyn RequestContext,
        matched: &MappingMatch,
        param: &ParamBinding,
    ) -> Result<Value, BindingError> {
        // Fail before looking at the request so misdeclared handlers surface
        // even when the value happens to be absent.
        if let ParamType::Unsupported(name) = param.ty {
            return Err(BindingError::unsupported(&param.name, name));
        }

        let produced = match param.source {
            ParamSource::Path => matched
                .path_var(&param.name)
                .map(|raw| convert_str(&param.name, raw, &param.ty))
                .transpose()?,
            ParamSource::Query => ctx
                .query_param(&param.name)
                .map(|raw| convert_str(&param.name, raw, &param.ty))
                .transpose()?,
            ParamSource::Form => ctx
                .form_param(&param.name)
                .map(|raw| convert_str(&param.name, raw, &param.ty))
                .transpose()?,
            ParamSource::Header => ctx
                .header(&param.name)
                .map(|raw| convert_str(&param.name, raw, &param.ty))
                .transpose()?,
            ParamSource::Body => self.produce_body(ctx, param)?,
        };

        match produced {
            Some(value) => {
                debug!(
                    parameter = %param.name,
                    source = %param.source,
                    ty = param.ty.name(),
                    "Parameter bound"
                );
                Ok(value)
            }
            None if param.required => Err(BindingError::missing(&param.name)),
            None => Ok(Value::Null),
        }
    }
}
