//! Field classification scoring.
//!
//! Pure function over the field's textual attributes and the static pattern
//! table; no side effects, safe to call concurrently.

use regex::Regex;
use tracing::debug;

use crate::classify::patterns::{pattern_families, PatternFamily};
use crate::domain::{ClassificationResult, FieldDescriptor};

/// Classify a form field against every pattern family.
///
/// Returns the canonical path with the highest family confidence. Families
/// are compared with strict `>`, so on a tie the first-declared family wins.
/// Returns `(None, 0.0)` when the combined text is empty or nothing matches.
pub fn classify(field: &FieldDescriptor) -> ClassificationResult {
    let text = field.combined_text();

    let mut best: Option<&'static str> = None;
    let mut best_confidence = 0.0;

    for family in pattern_families() {
        let confidence = family_confidence(&text, family);
        if confidence > best_confidence {
            best_confidence = confidence;
            best = Some(family.path);
        }
    }

    if let Some(path) = best {
        debug!(field = %field.name, path, confidence = best_confidence, "classified field");
        ClassificationResult {
            path: Some(path.to_string()),
            confidence: best_confidence,
        }
    } else {
        ClassificationResult::none()
    }
}

/// Score one family against the search text.
///
/// Base confidence for any rule match is 0.8, escalating to 1.0 when the
/// matched substring covers the whole (trimmed) text, or 0.9 when it occurs
/// as a separate word. The family's score is the maximum across its rules.
fn family_confidence(text: &str, family: &PatternFamily) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut max_confidence: f64 = 0.0;

    for rule in &family.rules {
        if let Some(matched) = rule.find(text) {
            let confidence = if matched.eq_ignore_ascii_case(text.trim()) {
                1.0
            } else if is_whole_word(matched, text) {
                0.9
            } else {
                0.8
            };

            max_confidence = max_confidence.max(confidence);
        }
    }

    max_confidence
}

/// Does `matched` occur at a word boundary inside `text`?
fn is_whole_word(matched: &str, text: &str) -> bool {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(matched)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}
