//! Value extraction from the parsed CV record.
//!
//! Paths are dotted, with bracket indices normalized first
//! (`experience[0].company` -> `experience.0.company`). Any unresolvable
//! segment is an extraction miss, represented as `None` and never an error.

mod transform;

pub use transform::{default_transform, Transform};

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

static INDEX_RE: OnceLock<Regex> = OnceLock::new();

/// Rewrite bracket indices to dotted segments.
fn normalize_path(path: &str) -> String {
    if !path.contains('[') {
        return path.to_string();
    }
    let re = INDEX_RE.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("static pattern"));
    re.replace_all(path, ".$1").into_owned()
}

/// Map virtual aggregate keys to the real top-level record field they
/// summarize. Ordinary paths pass through untouched.
fn resolve_virtual(path: &str) -> &str {
    match path {
        "skills_text" => "skills",
        "experience_summary" => "experience.0",
        "education_summary" => "education.0",
        _ => path,
    }
}

/// Resolve `path` against the record and render a display string.
///
/// Composite values (arrays, objects) go through `transform` when one is
/// supplied; scalars are stringified directly. Returns `None` when the path
/// is unresolvable, hits a type mismatch, or resolves to null/empty.
pub fn extract_value(record: &Value, path: &str, transform: Option<Transform>) -> Option<String> {
    let normalized = normalize_path(resolve_virtual(path));

    let mut current = record;
    for segment in normalized.split('.') {
        current = resolve_segment(current, segment)?;
        if current.is_null() {
            return None;
        }
    }

    render(current, transform)
}

/// Walk one path segment: all-digit segments index arrays, everything else
/// keys into objects. Anything else is a type mismatch.
fn resolve_segment<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    if segment.chars().all(|c| c.is_ascii_digit()) && !segment.is_empty() {
        let index: usize = segment.parse().ok()?;
        value.as_array()?.get(index)
    } else {
        value.as_object()?.get(segment)
    }
}

/// Render a resolved value as a display string.
fn render(value: &Value, transform: Option<Transform>) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => match transform {
            Some(t) => Some(t.apply(value)),
            None => serde_json::to_string(value).ok(),
        },
    }
}
