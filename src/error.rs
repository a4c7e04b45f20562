//! # Error Types
//!
//! Every failure the dispatch pipeline can surface to the host lifecycle.
//!
//! | Kind | Where | Recoverable per request |
//! |------|-------|-------------------------|
//! | [`BindingError`] | parameter producer | no, wrapped in [`DispatchError`] |
//! | [`DispatchError`] | method executor | no, propagated to the host |
//! | [`WriteError`] | response writers | no, propagated to the host |
//! | [`ConfigError`] | startup / writer selection | no, fatal misconfiguration |
//! | [`HostError`] | request context | no, propagated to the host |
//!
//! An unmatched request is *not* an error: the lifecycles answer it with a 404
//! and complete the response.

use std::fmt;

/// Why a single handler argument could not be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingErrorKind {
    /// A required value was absent from its source
    Missing,
    /// The raw value could not be converted to the declared type
    Conversion {
        /// The raw value as found in the request
        value: String,
        /// Name of the declared target type
        target: &'static str,
    },
    /// The declared type cannot be produced from any request source
    Unsupported {
        /// Name of the declared target type
        target: &'static str,
    },
    /// The request body could not be decoded
    MalformedBody {
        /// Decoder message
        reason: String,
    },
}

/// A handler argument could not be produced from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingError {
    /// Name of the parameter as declared on the handler
    pub parameter: String,
    /// What went wrong
    pub kind: BindingErrorKind,
}

impl BindingError {
    pub fn missing(parameter: &str) -> Self {
        Self {
            parameter: parameter.to_string(),
            kind: BindingErrorKind::Missing,
        }
    }

    pub fn conversion(parameter: &str, value: &str, target: &'static str) -> Self {
        Self {
            parameter: parameter.to_string(),
            kind: BindingErrorKind::Conversion {
                value: value.to_string(),
                target,
            },
        }
    }

    pub fn unsupported(parameter: &str, target: &'static str) -> Self {
        Self {
            parameter: parameter.to_string(),
            kind: BindingErrorKind::Unsupported { target },
        }
    }

    pub fn malformed_body(parameter: &str, reason: impl Into<String>) -> Self {
        Self {
            parameter: parameter.to_string(),
            kind: BindingErrorKind::MalformedBody {
                reason: reason.into(),
            },
        }
    }
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            BindingErrorKind::Missing => {
                write!(f, "missing required parameter '{}'", self.parameter)
            }
            BindingErrorKind::Conversion { value, target } => write!(
                f,
                "cannot convert value '{}' of parameter '{}' to {}",
                value, self.parameter, target
            ),
            BindingErrorKind::Unsupported { target } => write!(
                f,
                "parameter '{}' declares unsupported type {}",
                self.parameter, target
            ),
            BindingErrorKind::MalformedBody { reason } => write!(
                f,
                "request body for parameter '{}' is malformed: {}",
                self.parameter, reason
            ),
        }
    }
}

impl std::error::Error for BindingError {}

/// Step of the method executor that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    /// The handler bean could not be obtained
    Resolution,
    /// An argument could not be produced
    Binding,
    /// The handler body failed or panicked
    Invocation,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStage::Resolution => write!(f, "resolution"),
            DispatchStage::Binding => write!(f, "binding"),
            DispatchStage::Invocation => write!(f, "invocation"),
        }
    }
}

/// The single failure shape produced once a request matched a mapping
///
/// Resolution, binding and invocation failures all arrive here. The original
/// cause is kept and exposed through [`std::error::Error::source`].
#[derive(Debug)]
pub struct DispatchError {
    /// Name of the handler method that was being dispatched
    pub handler: String,
    /// Executor step that failed
    pub stage: DispatchStage,
    /// Original failure
    pub cause: anyhow::Error,
}

impl DispatchError {
    pub fn new(handler: &str, stage: DispatchStage, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            handler: handler.to_string(),
            stage,
            cause: cause.into(),
        }
    }

    /// Downcast the original cause, e.g. to a [`BindingError`]
    #[must_use]
    pub fn cause_as<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.cause.downcast_ref::<E>()
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dispatch of '{}' failed during {}: {}",
            self.handler, self.stage, self.cause
        )
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.cause)
    }
}

/// A response writer failed to serialize the stored result
#[derive(Debug)]
pub struct WriteError {
    /// Content type of the writer that failed
    pub content_type: String,
    /// Serializer or host failure
    pub cause: anyhow::Error,
}

impl WriteError {
    pub fn new(content_type: &str, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            content_type: content_type.to_string(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to write '{}' response: {}",
            self.content_type, self.cause
        )
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.cause)
    }
}

/// Misconfiguration detected at startup or at writer selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No writer serves the content type and no default writer is registered
    NoResponseWriter {
        /// The negotiated content type
        content_type: String,
    },
    /// A path pattern could not be parsed
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// What is wrong with it
        reason: String,
    },
    /// The host's default lifecycle is not registered with the factory
    MissingDefaultLifecycle,
    /// A lifecycle id was registered twice with the factory
    DuplicateLifecycle {
        /// The repeated id
        id: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoResponseWriter { content_type } => write!(
                f,
                "configuration error: no response writer for '{}' and no default writer registered",
                content_type
            ),
            ConfigError::InvalidPattern { pattern, reason } => {
                write!(f, "configuration error: invalid path pattern '{}': {}", pattern, reason)
            }
            ConfigError::MissingDefaultLifecycle => write!(
                f,
                "configuration error: the default lifecycle is not registered"
            ),
            ConfigError::DuplicateLifecycle { id } => {
                write!(f, "configuration error: lifecycle '{}' is already registered", id)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The request context rejected an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The response was already completed by an earlier phase
    ResponseCommitted,
    /// Any other host-side failure
    ///
    /// Never produced by [`crate::host::BufferedContext`]; hosts whose
    /// response writes can fail (closed connections, full buffers) report
    /// them here.
    Other(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::ResponseCommitted => write!(f, "response is already complete"),
            HostError::Other(msg) => write!(f, "host failure: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

/// Everything `execute` and `render` can propagate to the host
#[derive(Debug)]
pub enum LifecycleError {
    Dispatch(DispatchError),
    Write(WriteError),
    Config(ConfigError),
    Host(HostError),
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::Dispatch(e) => e.fmt(f),
            LifecycleError::Write(e) => e.fmt(f),
            LifecycleError::Config(e) => e.fmt(f),
            LifecycleError::Host(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::Dispatch(e) => Some(e),
            LifecycleError::Write(e) => Some(e),
            LifecycleError::Config(e) => Some(e),
            LifecycleError::Host(e) => Some(e),
        }
    }
}

impl From<DispatchError> for LifecycleError {
    fn from(e: DispatchError) -> Self {
        LifecycleError::Dispatch(e)
    }
}

impl From<WriteError> for LifecycleError {
    fn from(e: WriteError) -> Self {
        LifecycleError::Write(e)
    }
}

impl From<ConfigError> for LifecycleError {
    fn from(e: ConfigError) -> Self {
        LifecycleError::Config(e)
    }
}

impl From<HostError> for LifecycleError {
    fn from(e: HostError) -> Self {
        LifecycleError::Host(e)
    }
}
