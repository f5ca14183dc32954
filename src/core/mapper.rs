//! Mapping assembler.
//!
//! Walks a batch of field descriptors, classifies each one, extracts the
//! corresponding CV value, and produces a `MappingReport`. A failure on one
//! field never aborts the batch: extraction misses leave the field's
//! confidence recorded but excluded from `mappings`.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::domain::{
    ClassificationResult, FieldDescriptor, FieldMapping, MappedValue, MappingReport, UnmappedField,
};
use crate::extract::{default_transform, extract_value};
use crate::learning::LearningEngine;

/// Classification must clear this to produce a mapping.
const MAPPING_THRESHOLD: f64 = 0.5;

/// Classify a batch of fields, keeping only confident results.
pub fn classify_fields(fields: &[FieldDescriptor]) -> Vec<FieldMapping> {
    fields
        .iter()
        .filter_map(|field| {
            let result = classify(field);
            let path = result.path.filter(|_| result.confidence > MAPPING_THRESHOLD)?;
            Some(FieldMapping {
                field_name: field.name.clone(),
                transform: default_transform(&path),
                cv_path: path,
                confidence: result.confidence,
            })
        })
        .collect()
}

/// Map a batch of form fields against a CV record using the static
/// classifier only.
pub fn generate_mapping(record: &Value, fields: &[FieldDescriptor]) -> MappingReport {
    assemble(record, fields, classify)
}

/// Map a batch of form fields, consulting the domain's learned mappings
/// before falling back to the static classifier.
///
/// A store failure inside the learned lookup degrades that field to the
/// static classification rather than failing the batch.
pub fn generate_mapping_for_domain(
    record: &Value,
    fields: &[FieldDescriptor],
    domain: &str,
    engine: &LearningEngine,
) -> MappingReport {
    assemble(record, fields, |field| {
        let static_result = classify(field);

        match engine.improve_classification(domain, field) {
            Ok(learned) if learned.confidence > static_result.confidence => {
                debug!(
                    field = %field.name,
                    domain,
                    confidence = learned.confidence,
                    "using learned classification"
                );
                learned
            }
            Ok(_) => static_result,
            Err(e) => {
                warn!(domain, error = %e, "learned lookup failed, using static classifier");
                static_result
            }
        }
    })
}

/// Shared assembly loop. `classify_fn` decides the classification per field;
/// everything else (threshold, extraction, report bookkeeping) is common.
fn assemble<F>(record: &Value, fields: &[FieldDescriptor], classify_fn: F) -> MappingReport
where
    F: Fn(&FieldDescriptor) -> ClassificationResult,
{
    let mut report = MappingReport::default();
    let mut handled: HashSet<String> = HashSet::new();

    for field in fields {
        let result = classify_fn(field);

        let Some(path) = result.path.filter(|_| result.confidence > MAPPING_THRESHOLD) else {
            continue;
        };

        let value = extract_value(record, &path, default_transform(&path))
            .filter(|v| !v.is_empty());

        if let Some(value) = value {
            report.mappings.push(MappedValue {
                field_name: field.name.clone(),
                cv_path: path,
                value,
                confidence: result.confidence,
            });
        } else {
            debug!(field = %field.name, path = %path, "classified but no value in record");
        }

        // The field counts as handled even when extraction came up empty.
        report
            .confidence_scores
            .insert(field.name.clone(), result.confidence);
        handled.insert(field.name.clone());
    }

    for field in fields {
        if !field.name.is_empty() && !handled.contains(&field.name) {
            report.unmapped_fields.push(UnmappedField::from(field));
        }
    }

    info!(
        mapped = report.mappings.len(),
        unmapped = report.unmapped_fields.len(),
        total = fields.len(),
        "generated field mapping"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, field_type: &str, label: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            field_type: field_type.to_string(),
            label: if label.is_empty() {
                None
            } else {
                Some(label.to_string())
            },
            ..Default::default()
        }
    }

    fn sample_record() -> Value {
        json!({
            "personal_info": {
                "full_name": "John Doe",
                "email": "john.doe@email.com",
                "phone": "+1234567890"
            },
            "experience": [
                {"job_title": "Senior Developer", "company": "Tech Corp"}
            ],
            "skills": [
                {"category": "Programming", "items": ["Python", "JavaScript"]}
            ]
        })
    }

    #[test]
    fn test_classify_fields_filters_below_threshold() {
        let fields = vec![field("email", "email", ""), field("xyz123", "text", "")];
        let mappings = classify_fields(&fields);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].cv_path, "personal_info.email");
        assert!(mappings[0].transform.is_none());
    }

    #[test]
    fn test_generate_mapping_basic() {
        let record = sample_record();
        let fields = vec![
            field("email", "email", "Email Address"),
            field("company", "text", "Current Company"),
        ];

        let report = generate_mapping(&record, &fields);

        assert_eq!(report.mappings.len(), 2);
        assert_eq!(report.mappings[0].value, "john.doe@email.com");
        assert_eq!(report.mappings[1].value, "Tech Corp");
        assert!(report.unmapped_fields.is_empty());
    }

    #[test]
    fn test_unknown_field_goes_unmapped() {
        let record = sample_record();
        let fields = vec![field("favorite_color", "text", "")];

        let report = generate_mapping(&record, &fields);

        assert!(report.mappings.is_empty());
        assert_eq!(report.unmapped_fields.len(), 1);
        assert_eq!(report.unmapped_fields[0].name, "favorite_color");
        assert!(!report.confidence_scores.contains_key("favorite_color"));
    }

    #[test]
    fn test_classified_field_without_value_keeps_confidence() {
        // "country" classifies fine but the record has no country
        let record = sample_record();
        let fields = vec![field("country", "text", "")];

        let report = generate_mapping(&record, &fields);

        assert!(report.mappings.is_empty());
        assert!(report.confidence_scores.contains_key("country"));
        // Handled fields stay out of unmapped_fields even without a value
        assert!(report.unmapped_fields.is_empty());
    }

    #[test]
    fn test_skills_virtual_key_transform() {
        let record = sample_record();
        let fields = vec![field("skills", "textarea", "Technical Skills")];

        let report = generate_mapping(&record, &fields);

        assert_eq!(report.mappings.len(), 1);
        assert_eq!(report.mappings[0].cv_path, "skills_text");
        assert_eq!(report.mappings[0].value, "Python, JavaScript");
    }

    #[test]
    fn test_empty_name_field_is_dropped_silently() {
        let record = sample_record();
        let fields = vec![FieldDescriptor::default()];

        let report = generate_mapping(&record, &fields);

        assert!(report.mappings.is_empty());
        assert!(report.unmapped_fields.is_empty());
        assert!(report.confidence_scores.is_empty());
    }

    #[test]
    fn test_input_order_is_preserved() {
        let record = sample_record();
        let fields = vec![
            field("company", "text", ""),
            field("email", "email", ""),
            field("phone", "tel", ""),
        ];

        let report = generate_mapping(&record, &fields);

        let names: Vec<_> = report.mappings.iter().map(|m| m.field_name.as_str()).collect();
        assert_eq!(names, vec!["company", "email", "phone"]);
    }
}
