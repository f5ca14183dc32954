//! Global preferences and per-site configuration.
//!
//! Stored as JSON blobs by the persistence layer; not consulted by the
//! classification algorithms themselves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Global behavior toggles for the autofill caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_true")]
    pub auto_fill_enabled: bool,

    /// Require user confirmation before submitting a filled form
    #[serde(default = "default_true")]
    pub confirmation_required: bool,

    /// Minimum confidence for a mapping to be auto-filled
    #[serde(default = "default_threshold")]
    pub min_confidence_threshold: f64,

    #[serde(default = "default_language")]
    pub preferred_language: String,

    /// Caller-supplied field name -> cv_path overrides
    #[serde(default)]
    pub custom_field_mappings: HashMap<String, String>,

    /// Domains the user opted out of
    #[serde(default)]
    pub excluded_sites: Vec<String>,

    #[serde(default)]
    pub debug_mode: bool,
}

fn default_true() -> bool {
    true
}
fn default_threshold() -> f64 {
    0.7
}
fn default_language() -> String {
    "en".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_fill_enabled: true,
            confirmation_required: true,
            min_confidence_threshold: default_threshold(),
            preferred_language: default_language(),
            custom_field_mappings: HashMap::new(),
            excluded_sites: Vec::new(),
            debug_mode: false,
        }
    }
}

/// Per-domain overrides and notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub domain: String,

    /// CSS selector overrides keyed by field name
    #[serde(default)]
    pub custom_selectors: HashMap<String, String>,

    #[serde(default = "default_true")]
    pub is_enabled: bool,

    #[serde(default)]
    pub notes: String,
}

impl SiteConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            custom_selectors: HashMap::new(),
            is_enabled: true,
            notes: String::new(),
        }
    }
}
