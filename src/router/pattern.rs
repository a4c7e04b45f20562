//! Path patterns and request path normalization.
//!
//! A pattern is a `/`-separated list of segments. A segment written as
//! `{name}` is a variable and matches any non-empty request segment; any
//! other segment is a literal and must match exactly.
//!
//! ```text
//! /users/{id}/posts   → [Literal("users"), Variable("id"), Literal("posts")]
//! /                   → []
//! ```

use super::core::ParamVec;
use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Segment storage for a normalized request path; most paths fit inline
pub type SegmentVec<'a> = SmallVec<[&'a str; 16]>;

#[allow(clippy::expect_used)]
static VARIABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("variable name regex is valid")
});

/// Split a request path into its significant segments
///
/// Drops any `?query` or `#fragment` and ignores empty segments, so `//a/b/`
/// and `/a/b` normalize identically and `/` has no segments at all.
#[must_use]
pub fn normalize_path(path: &str) -> SegmentVec<'_> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

/// One segment of a [`PathPattern`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Variable(Arc<str>),
}

/// A compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    literals: usize,
}

impl PathPattern {
    /// Compile a pattern such as `/users/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for malformed variables
    /// (`{}`, `{1x}`, `user-{id}`) or a variable name used twice.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literals = 0;
        for segment in normalize_path(pattern) {
            if let Some(name) = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                if !VARIABLE_NAME.is_match(name) {
                    return Err(invalid(format!("invalid variable name '{name}'")));
                }
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Variable(v) if v.as_ref() == name));
                if duplicate {
                    return Err(invalid(format!("variable '{name}' appears twice")));
                }
                segments.push(Segment::Variable(Arc::from(name)));
            } else if segment.contains(['{', '}']) {
                return Err(invalid(format!(
                    "segment '{segment}' mixes literal text and a variable"
                )));
            } else {
                literals += 1;
                segments.push(Segment::Literal(segment.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
            literals,
        })
    }

    /// The pattern as registered
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of literal segments; the matcher prefers higher counts
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.literals
    }

    /// Names of the variables, in path order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_ref()),
            Segment::Literal(_) => None,
        })
    }

    /// Same segment count and every literal equal
    #[must_use]
    pub fn is_match(&self, path: &[&str]) -> bool {
        self.segments.len() == path.len()
            && self.segments.iter().zip(path).all(|(seg, part)| match seg {
                Segment::Literal(lit) => lit == part,
                Segment::Variable(_) => true,
            })
    }

    /// Match `path` and capture variable values
    ///
    /// Captured values are percent-decoded; values that do not decode to
    /// UTF-8 are kept as sent.
    #[must_use]
    pub fn captures(&self, path: &[&str]) -> Option<ParamVec> {
        if !self.is_match(path) {
            return None;
        }
        let mut vars = ParamVec::new();
        for (seg, part) in self.segments.iter().zip(path) {
            if let Segment::Variable(name) = seg {
                let value = urlencoding::decode(part).unwrap_or(Cow::Borrowed(*part));
                vars.push((Arc::clone(name), value.into_owned()));
            }
        }
        Some(vars)
    }

    /// Shape used to detect registrations that can never be told apart
    pub(crate) fn shape(&self) -> String {
        let mut shape = String::with_capacity(self.raw.len());
        for seg in &self.segments {
            shape.push('/');
            match seg {
                Segment::Literal(lit) => shape.push_str(lit),
                Segment::Variable(_) => shape.push_str("{}"),
            }
        }
        if shape.is_empty() {
            shape.push('/');
        }
        shape
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
