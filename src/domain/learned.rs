//! Learned-mapping aggregates and feedback records.
//!
//! Observations are append-only facts; the store aggregates them into
//! `LearnedMapping` rows per (domain, field_name, cv_path) group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate view of learned observations for one (field_name, cv_path) pair.
///
/// Rows are pre-filtered to `avg_confidence > 0.5` and ordered by usage
/// count, then average confidence, both descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedMapping {
    /// Form field name as observed on the page
    pub field_name: String,

    /// Canonical path the field was mapped to
    pub cv_path: String,

    /// Mean confidence across all observations in the group
    pub avg_confidence: f64,

    /// Number of observations in the group
    pub usage_count: i64,
}

/// A user correction or successful fill held in the engine's ring buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Web origin the feedback applies to
    pub domain: String,

    pub field_name: String,
    pub field_type: String,
    pub field_label: String,
    pub field_placeholder: String,

    /// Path the classifier suggested
    pub suggested_path: String,

    /// Path the user corrected it to
    pub corrected_path: String,

    /// Confidence of the original (wrong) suggestion
    pub original_confidence: f64,

    /// When the feedback was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Usage summary for one learned field, for operator visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldUsage {
    pub field: String,
    pub usage_count: i64,
}

/// Domain-level learning summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainStats {
    pub domain: String,
    pub total_learned_mappings: usize,
    pub most_common_fields: Vec<FieldUsage>,
    pub average_confidence: f64,
}

/// Portable export of a domain's learned mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedExport {
    pub domain: String,
    pub mappings: Vec<LearnedMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learned_mapping_serialization() {
        let mapping = LearnedMapping {
            field_name: "email2".to_string(),
            cv_path: "personal_info.email".to_string(),
            avg_confidence: 0.95,
            usage_count: 3,
        };

        let json = serde_json::to_string(&mapping).unwrap();
        let parsed: LearnedMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mapping);
    }

    #[test]
    fn test_export_round_trip() {
        let export = LearnedExport {
            domain: "acme.com".to_string(),
            mappings: vec![LearnedMapping {
                field_name: "company".to_string(),
                cv_path: "experience[0].company".to_string(),
                avg_confidence: 0.8,
                usage_count: 1,
            }],
        };

        let json = serde_json::to_string(&export).unwrap();
        let parsed: LearnedExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.domain, "acme.com");
        assert_eq!(parsed.mappings.len(), 1);
    }
}
