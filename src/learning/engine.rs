//! Learning engine: records feedback and improves future classifications.
//!
//! Writes go to the SQLite store; a bounded per-domain ring buffer keeps the
//! most recent feedback in memory for fast inspection. The engine instance
//! is passed explicitly to every consumer, never held as global state.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{
    ClassificationResult, DomainStats, FeedbackEntry, FieldDescriptor, FieldUsage, LearnedExport,
    LearnedMapping,
};
use crate::learning::similarity_score;
use crate::store::{MappingStore, StoreResult};

/// Exact-name matches get their stored confidence boosted by this factor.
const EXACT_MATCH_BOOST: f64 = 1.2;

/// Fuzzy candidates below this similarity are ignored.
const SIMILARITY_FLOOR: f64 = 0.3;

/// Feedback entries retained per domain.
const FEEDBACK_CAPACITY: usize = 64;

/// Top-N fields reported in domain statistics.
const STATS_TOP_FIELDS: usize = 10;

/// Per-domain learning over a durable observation store.
pub struct LearningEngine {
    store: MappingStore,
    feedback: HashMap<String, VecDeque<FeedbackEntry>>,
}

impl LearningEngine {
    pub fn new(store: MappingStore) -> Self {
        Self {
            store,
            feedback: HashMap::new(),
        }
    }

    /// Record an explicit user correction.
    ///
    /// The corrected path is ground truth, so the observation is stored at
    /// confidence 1.0 regardless of what the model originally guessed.
    pub fn record_correction(
        &mut self,
        domain: &str,
        field: &FieldDescriptor,
        suggested_path: &str,
        corrected_path: &str,
        original_confidence: f64,
    ) -> StoreResult<()> {
        let entry = FeedbackEntry {
            domain: domain.to_string(),
            field_name: field.name.clone(),
            field_type: field.field_type.clone(),
            field_label: field.label.clone().unwrap_or_default(),
            field_placeholder: field.placeholder.clone().unwrap_or_default(),
            suggested_path: suggested_path.to_string(),
            corrected_path: corrected_path.to_string(),
            original_confidence,
            recorded_at: Utc::now(),
        };
        self.push_feedback(domain, entry);

        self.store
            .save_observation(domain, &field.name, corrected_path, 1.0)?;

        info!(domain, field = %field.name, corrected_path, "recorded correction");
        Ok(())
    }

    /// Record a successful fill at the confidence it was achieved with.
    ///
    /// An implicit positive signal, weighted lower than explicit corrections.
    pub fn record_success(
        &self,
        domain: &str,
        field_name: &str,
        path: &str,
        confidence: f64,
    ) -> StoreResult<()> {
        self.store
            .save_observation(domain, field_name, path, confidence)
    }

    /// Classify a field from the domain's learned history.
    ///
    /// An exact (case-insensitive) field-name match returns its path with
    /// confidence boosted by x1.2, capped at 1.0. Otherwise the best fuzzy
    /// candidate above the similarity floor is returned at
    /// `stored_confidence * similarity`. `(None, 0.0)` when nothing applies.
    pub fn improve_classification(
        &self,
        domain: &str,
        field: &FieldDescriptor,
    ) -> StoreResult<ClassificationResult> {
        let learned = self.store.get_learned_mappings(domain)?;

        if let Some(mapping) = learned
            .iter()
            .find(|m| m.field_name.eq_ignore_ascii_case(&field.name))
        {
            let confidence = (mapping.avg_confidence * EXACT_MATCH_BOOST).min(1.0);
            debug!(domain, field = %field.name, path = %mapping.cv_path, "exact learned match");
            return Ok(ClassificationResult {
                path: Some(mapping.cv_path.clone()),
                confidence,
            });
        }

        let field_text = field.learning_text();

        let mut best: Option<&LearnedMapping> = None;
        let mut best_score = 0.0;

        for mapping in &learned {
            let score = similarity_score(&field_text, &mapping.field_name);
            if score > best_score && score > SIMILARITY_FLOOR {
                best_score = score;
                best = Some(mapping);
            }
        }

        if let Some(mapping) = best {
            let confidence = (mapping.avg_confidence * best_score).clamp(0.0, 1.0);
            debug!(
                domain,
                field = %field.name,
                path = %mapping.cv_path,
                similarity = best_score,
                "fuzzy learned match"
            );
            return Ok(ClassificationResult {
                path: Some(mapping.cv_path.clone()),
                confidence,
            });
        }

        Ok(ClassificationResult::none())
    }

    /// Recent feedback for a domain, oldest first.
    pub fn recent_feedback(&self, domain: &str) -> Vec<FeedbackEntry> {
        self.feedback
            .get(domain)
            .map(|buf| buf.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Summary of a domain's learned state, for operator visibility.
    pub fn domain_statistics(&self, domain: &str) -> StoreResult<DomainStats> {
        let learned = self.store.get_learned_mappings(domain)?;

        let average_confidence = if learned.is_empty() {
            0.0
        } else {
            learned.iter().map(|m| m.avg_confidence).sum::<f64>() / learned.len() as f64
        };

        Ok(DomainStats {
            domain: domain.to_string(),
            total_learned_mappings: learned.len(),
            most_common_fields: learned
                .iter()
                .take(STATS_TOP_FIELDS)
                .map(|m| FieldUsage {
                    field: m.field_name.clone(),
                    usage_count: m.usage_count,
                })
                .collect(),
            average_confidence,
        })
    }

    /// Export a domain's learned mappings for transfer or backup.
    pub fn export(&self, domain: &str) -> StoreResult<LearnedExport> {
        Ok(LearnedExport {
            domain: domain.to_string(),
            mappings: self.store.get_learned_mappings(domain)?,
        })
    }

    /// Import previously exported mappings as fresh observations.
    pub fn import(&self, export: &LearnedExport) -> StoreResult<usize> {
        for mapping in &export.mappings {
            self.store.save_observation(
                &export.domain,
                &mapping.field_name,
                &mapping.cv_path,
                mapping.avg_confidence,
            )?;
        }
        Ok(export.mappings.len())
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    fn push_feedback(&mut self, domain: &str, entry: FeedbackEntry) {
        let buffer = self.feedback.entry(domain.to_string()).or_default();
        if buffer.len() == FEEDBACK_CAPACITY {
            buffer.pop_front();
        }
        buffer.push_back(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LearningEngine {
        LearningEngine::new(MappingStore::open_in_memory().unwrap())
    }

    fn field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, "text")
    }

    #[test]
    fn test_correction_stored_at_full_confidence() {
        let mut engine = engine();
        engine
            .record_correction(
                "acme.com",
                &field("email2"),
                "personal_info.full_name",
                "personal_info.email",
                0.6,
            )
            .unwrap();

        let learned = engine.store().get_learned_mappings("acme.com").unwrap();
        assert_eq!(learned.len(), 1);
        assert_eq!(learned[0].cv_path, "personal_info.email");
        assert_eq!(learned[0].avg_confidence, 1.0);
    }

    #[test]
    fn test_exact_match_boost_is_capped() {
        let mut engine = engine();
        for _ in 0..2 {
            engine
                .record_correction(
                    "acme.com",
                    &field("email2"),
                    "personal_info.full_name",
                    "personal_info.email",
                    0.6,
                )
                .unwrap();
        }

        let result = engine
            .improve_classification("acme.com", &field("email2"))
            .unwrap();
        assert_eq!(result.path.as_deref(), Some("personal_info.email"));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let mut engine = engine();
        engine
            .record_correction("acme.com", &field("Email2"), "", "personal_info.email", 0.6)
            .unwrap();

        let result = engine
            .improve_classification("acme.com", &field("EMAIL2"))
            .unwrap();
        assert_eq!(result.path.as_deref(), Some("personal_info.email"));
    }

    #[test]
    fn test_boost_never_lowers_stored_confidence() {
        let engine = engine();
        engine
            .record_success("acme.com", "phone2", "personal_info.phone", 0.7)
            .unwrap();

        let result = engine
            .improve_classification("acme.com", &field("phone2"))
            .unwrap();
        assert!(result.confidence >= 0.7);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn test_fuzzy_fallback() {
        let engine = engine();
        engine
            .record_success("acme.com", "email", "personal_info.email", 0.9)
            .unwrap();

        // Different name, but "email" appears as a token of the field text
        let candidate = FieldDescriptor {
            name: "contact_field".to_string(),
            field_type: "text".to_string(),
            label: Some("work email address".to_string()),
            ..Default::default()
        };

        let result = engine
            .improve_classification("acme.com", &candidate)
            .unwrap();
        assert_eq!(result.path.as_deref(), Some("personal_info.email"));
        assert!(result.confidence > 0.0);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn test_no_history_returns_none() {
        let engine = engine();
        let result = engine
            .improve_classification("unknown.com", &field("email"))
            .unwrap();
        assert_eq!(result.path, None);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_feedback_ring_buffer_is_bounded() {
        let mut engine = engine();
        for i in 0..(FEEDBACK_CAPACITY + 10) {
            engine
                .record_correction(
                    "acme.com",
                    &field(&format!("field{i}")),
                    "",
                    "personal_info.email",
                    0.5,
                )
                .unwrap();
        }

        let feedback = engine.recent_feedback("acme.com");
        assert_eq!(feedback.len(), FEEDBACK_CAPACITY);
        // Oldest entries were evicted
        assert_eq!(feedback[0].field_name, "field10");
    }

    #[test]
    fn test_domain_statistics() {
        let engine = engine();
        engine
            .record_success("acme.com", "email", "personal_info.email", 1.0)
            .unwrap();
        engine
            .record_success("acme.com", "email", "personal_info.email", 0.8)
            .unwrap();
        engine
            .record_success("acme.com", "phone", "personal_info.phone", 0.7)
            .unwrap();

        let stats = engine.domain_statistics("acme.com").unwrap();
        assert_eq!(stats.total_learned_mappings, 2);
        assert_eq!(stats.most_common_fields[0].field, "email");
        assert_eq!(stats.most_common_fields[0].usage_count, 2);
        assert!((stats.average_confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = engine();
        source
            .record_success("acme.com", "email", "personal_info.email", 0.9)
            .unwrap();

        let export = source.export("acme.com").unwrap();
        assert_eq!(export.mappings.len(), 1);

        let target = engine();
        assert_eq!(target.import(&export).unwrap(), 1);

        let learned = target.store().get_learned_mappings("acme.com").unwrap();
        assert_eq!(learned[0].cv_path, "personal_info.email");
    }
}
