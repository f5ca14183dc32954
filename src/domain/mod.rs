//! Data structures for form fields, mappings, and learned observations.

mod field;
mod learned;
mod prefs;

pub use field::{
    ClassificationResult, FieldDescriptor, FieldMapping, MappedValue, MappingReport,
    UnmappedField,
};
pub use learned::{DomainStats, FeedbackEntry, FieldUsage, LearnedExport, LearnedMapping};
pub use prefs::{Preferences, SiteConfig};
