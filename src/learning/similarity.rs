//! Lexical similarity between a field's text and a learned field name.

use std::collections::HashSet;

/// Jaccard overlap of whitespace-tokenized, lower-cased word sets, with a
/// x1.5 bonus when the learned name occurs verbatim as a substring or any
/// of its words appears as a token of the field text. Capped at 1.0.
pub fn similarity_score(field_text: &str, mapping_field: &str) -> f64 {
    let field_text = field_text.to_lowercase();
    let mapping_field = mapping_field.to_lowercase();

    let field_words: HashSet<&str> = field_text.split_whitespace().collect();
    let mapping_words: HashSet<&str> = mapping_field.split_whitespace().collect();

    if field_words.is_empty() || mapping_words.is_empty() {
        return 0.0;
    }

    let intersection = field_words.intersection(&mapping_words).count();
    let union = field_words.union(&mapping_words).count();
    let mut score = intersection as f64 / union as f64;

    let verbatim = field_text.contains(&mapping_field)
        || mapping_words.iter().any(|w| field_words.contains(w));
    if verbatim {
        score *= 1.5;
    }

    score.min(1.0)
}
