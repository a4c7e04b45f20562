//! # Dispatch Configuration Module
//!
//! Settings shared by the action and REST lifecycles.
//!
//! ## Sources
//!
//! Configuration is resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults ([`DispatchConfig::default`])
//! 2. A YAML file ([`DispatchConfig::load`]) or string ([`DispatchConfig::from_yaml_str`])
//! 3. Environment variables ([`DispatchConfig::with_env_overrides`])
//!
//! ## Environment Variables
//!
//! ### `VIEWROUTE_DEFAULT_CONTENT_TYPE`
//!
//! Content type assigned by the REST render phase when the response has none.
//!
//! Default: `application/json`
//!
//! ## Example File
//!
//! ```yaml
//! default_content_type: application/yaml
//! not_found_rest_message: No such resource
//! ```
//!
//! Missing keys keep their defaults.
//!
//! ```rust
//! use viewroute::config::DispatchConfig;
//!
//! let config = DispatchConfig::from_yaml_str("default_content_type: text/plain\n").unwrap();
//! assert_eq!(config.default_content_type, "text/plain");
//! assert_eq!(config.not_found_rest_message, "Unable to match request");
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_CONTENT_TYPE_ENV: &str = "VIEWROUTE_DEFAULT_CONTENT_TYPE";

/// Lifecycle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Content type the REST render phase assigns when none is set
    pub default_content_type: String,
    /// 404 message sent by the action lifecycle for unmatched requests
    pub not_found_action_message: String,
    /// 404 message sent by the REST lifecycle for unmatched requests
    pub not_found_rest_message: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_content_type: "application/json".to_string(),
            not_found_action_message: "Unable to match action".to_string(),
            not_found_rest_message: "Unable to match request".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Parse a YAML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this struct
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse dispatch configuration")
    }

    /// Read and parse a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dispatch configuration {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid dispatch configuration {}", path.display()))?;
        info!(
            path = %path.display(),
            default_content_type = %config.default_content_type,
            "Dispatch configuration loaded"
        );
        Ok(config)
    }

    /// Defaults with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides on top of `self`
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(content_type) = env::var(DEFAULT_CONTENT_TYPE_ENV) {
            let content_type = content_type.trim();
            if !content_type.is_empty() {
                debug!(content_type, "Default content type overridden from environment");
                self.default_content_type = content_type.to_string();
            }
        }
        self
    }
}
