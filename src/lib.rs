//! formfill - Form-field classification and CV autofill mapping engine
//!
//! Maps free-form web form fields to values extracted from a parsed CV so
//! that a form can be auto-filled.
//!
//! # Architecture
//!
//! Three cooperating pieces:
//! - A pattern classifier scores a field's textual attributes against
//!   canonical-path pattern families
//! - A value extractor resolves canonical paths against the nested CV
//!   record, applying named transforms for composite values
//! - A learning engine records corrections and successful fills per web
//!   domain and blends that history into future classifications
//!
//! # Modules
//!
//! - `classify`: Pattern families and field classification
//! - `extract`: Path resolution and value transforms
//! - `core`: Batch mapping assembler
//! - `learning`: Correction recording and learned classification
//! - `store`: SQLite persistence for observations and preferences
//! - `domain`: Data structures (fields, mappings, reports)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Map a detected form against a parsed CV
//! formfill map --record cv.json --fields fields.json --domain jobs.example.com
//!
//! # Inspect what a domain has learned
//! formfill stats jobs.example.com
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod extract;
pub mod learning;
pub mod store;

// Re-export main types at crate root for convenience
pub use crate::classify::classify;
pub use crate::core::{classify_fields, generate_mapping, generate_mapping_for_domain};
pub use domain::{
    ClassificationResult, DomainStats, FieldDescriptor, FieldMapping, LearnedMapping,
    MappedValue, MappingReport, Preferences, SiteConfig, UnmappedField,
};
pub use extract::{extract_value, Transform};
pub use learning::LearningEngine;
pub use store::{MappingStore, StoreError};
