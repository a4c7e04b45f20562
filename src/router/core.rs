//! Mapping registry core: built once at startup, read concurrently per request.

use super::pattern::{normalize_path, PathPattern};
use crate::error::ConfigError;
use crate::handler::HandlerMethod;
use crate::host::RequestContext;
use http::Method;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Maximum number of path variables before heap allocation.
/// Most routes have ≤4 variables (e.g. /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated path variable storage.
///
/// Names are `Arc<str>` shared with the compiled pattern; values are the
/// per-request strings taken from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A registered handler: path pattern, optional verb and handler method
///
/// A mapping without a verb accepts every method; the action lifecycle
/// registers mappings that way.
#[derive(Debug, Clone)]
pub struct Mapping {
    pattern: PathPattern,
    method: Option<Method>,
    handler: Arc<HandlerMethod>,
}

impl Mapping {
    /// Map `pattern` to `handler` for any verb
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile
    pub fn new(pattern: &str, handler: HandlerMethod) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            method: None,
            handler: Arc::new(handler),
        })
    }

    /// Restrict the mapping to one HTTP verb
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<HandlerMethod> {
        &self.handler
    }

    fn accepts(&self, method: &Method) -> bool {
        self.method.as_ref().is_none_or(|m| m == method)
    }
}

/// Result of matching one request
///
/// Created per request and owned by that request's execution.
#[derive(Debug, Clone)]
pub struct MappingMatch {
    /// The winning mapping (shared with the registry)
    pub mapping: Arc<Mapping>,
    /// Variables captured from the path (e.g. `{id}` → `("id", "42")`)
    pub path_vars: ParamVec,
}

impl MappingMatch {
    /// Get a path variable by name
    #[inline]
    #[must_use]
    pub fn path_var(&self, name: &str) -> Option<&str> {
        self.path_vars
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_vars to a HashMap
    /// Note: This allocates - use path_var() on the request path instead
    #[must_use]
    pub fn path_vars_map(&self) -> HashMap<String, String> {
        self.path_vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerMethod {
        self.mapping.handler()
    }
}

/// Collects mappings before the registry is frozen
#[derive(Debug, Default)]
pub struct MappingRegistryBuilder {
    mappings: Vec<Mapping>,
}

impl MappingRegistryBuilder {
    /// Append a mapping; registration order is the final tie-break
    #[must_use]
    pub fn add(mut self, mapping: Mapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// Map `method pattern` to `handler`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile
    pub fn route(self, method: Method, pattern: &str, handler: HandlerMethod) -> Result<Self, ConfigError> {
        Ok(self.add(Mapping::new(pattern, handler)?.with_method(method)))
    }

    /// Map `pattern` to `handler` for every verb
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile
    pub fn any(self, pattern: &str, handler: HandlerMethod) -> Result<Self, ConfigError> {
        Ok(self.add(Mapping::new(pattern, handler)?))
    }

    /// Freeze the mappings into a read-only registry
    #[must_use]
    pub fn build(self) -> MappingRegistry {
        MappingRegistry::new(self.mappings)
    }
}

/// Read-only set of mappings and the matcher over them
///
/// # Matching
///
/// A request path matches a pattern when both have the same number of
/// segments and every literal segment is equal. Among all mappings whose
/// pattern *and* verb fit the request:
///
/// 1. the pattern with more literal segments wins (`/a/fixed` beats `/a/{x}`)
/// 2. on equal literal counts, the mapping registered first wins
///
/// A path that only matches mappings for other verbs is a plain miss; there
/// is no separate "method not allowed" outcome.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    /// Mappings in registration order
    mappings: Vec<Arc<Mapping>>,
    /// Segment count → indexes into `mappings`, ascending
    by_segments: HashMap<usize, Vec<usize>>,
}

impl MappingRegistry {
    #[must_use]
    pub fn builder() -> MappingRegistryBuilder {
        MappingRegistryBuilder::default()
    }

    /// Build a registry from mappings in registration order
    #[must_use]
    pub fn new(mappings: Vec<Mapping>) -> Self {
        if mappings.is_empty() {
            info!(mappings_count = 0, "Mapping registry loaded with no mappings");
            return Self::default();
        }

        let mut seen = HashSet::new();
        let mut by_segments: HashMap<usize, Vec<usize>> = HashMap::new();
        let mappings: Vec<Arc<Mapping>> = mappings.into_iter().map(Arc::new).collect();

        for (index, mapping) in mappings.iter().enumerate() {
            let verb = mapping.method().map(Method::as_str).unwrap_or("*");
            if !seen.insert((verb.to_string(), mapping.pattern().shape())) {
                warn!(
                    method = verb,
                    pattern = %mapping.pattern(),
                    handler_name = mapping.handler().name(),
                    "Mapping shadowed by an earlier registration with the same shape"
                );
            }
            by_segments
                .entry(mapping.pattern().segment_count())
                .or_default()
                .push(index);
        }

        let mappings_summary: Vec<String> = mappings
            .iter()
            .take(10)
            .map(|m| {
                format!(
                    "{} {} -> {}",
                    m.method().map(Method::as_str).unwrap_or("*"),
                    m.pattern(),
                    m.handler().name()
                )
            })
            .collect();

        info!(
            mappings_count = mappings.len(),
            mappings_summary = ?mappings_summary,
            "Mapping registry loaded"
        );

        Self {
            mappings,
            by_segments,
        }
    }

    /// Match the request carried by `ctx`
    #[must_use]
    pub fn match_request(&self, ctx: &dyn RequestContext) -> Option<MappingMatch> {
        self.route(ctx.method(), ctx.path())
    }

    /// Match `method path` against the registered mappings
    ///
    /// # Returns
    ///
    /// * `Some(MappingMatch)` - the best mapping and its captured variables
    /// * `None` - nothing fits; the caller answers with a 404
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// if let Some(m) = registry.route(&Method::GET, "/users/42") {
    ///     assert_eq!(m.path_var("id"), Some("42"));
    /// }
    /// ```
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<MappingMatch> {
        debug!(method = %method, path = %path, "Mapping match attempt");
        let match_start = Instant::now();

        let segments = normalize_path(path);
        let mut best: Option<&Arc<Mapping>> = None;
        if let Some(candidates) = self.by_segments.get(&segments.len()) {
            for &index in candidates {
                let mapping = &self.mappings[index];
                if !mapping.accepts(method) || !mapping.pattern().is_match(&segments) {
                    continue;
                }
                // Strictly greater keeps the earlier registration on ties
                let better = best.is_none_or(|b| {
                    mapping.pattern().literal_count() > b.pattern().literal_count()
                });
                if better {
                    best = Some(mapping);
                }
            }
        }

        let match_duration = match_start.elapsed();
        let Some(mapping) = best else {
            warn!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No mapping matched"
            );
            return None;
        };

        let path_vars = mapping.pattern().captures(&segments).unwrap_or_default();
        if match_duration > Duration::from_millis(1) {
            warn!(
                method = %method,
                path = %path,
                handler_name = mapping.handler().name(),
                pattern = %mapping.pattern(),
                duration_us = match_duration.as_micros(),
                "Slow mapping match detected"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                handler_name = mapping.handler().name(),
                pattern = %mapping.pattern(),
                path_vars = ?path_vars,
                duration_us = match_duration.as_micros(),
                "Mapping matched"
            );
        }

        Some(MappingMatch {
            mapping: Arc::clone(mapping),
            path_vars,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Registered mappings in registration order
    #[must_use]
    pub fn mappings(&self) -> &[Arc<Mapping>] {
        &self.mappings
    }

    /// Every registered pattern, prefixed with its verb (`*` for any)
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.mappings
            .iter()
            .map(|m| {
                format!(
                    "{} {}",
                    m.method().map(Method::as_str).unwrap_or("*"),
                    m.pattern()
                )
            })
            .collect()
    }
}
