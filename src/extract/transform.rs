//! Named transforms for composite CV values.
//!
//! A closed set of variants rather than a string-keyed registry: the
//! assembler looks up a path's default transform in a static table, and
//! every transform is total over malformed input, degrading to an empty
//! string instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A pure function from a composite record value to a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Flatten skill categories into one comma-separated list
    JoinSkills,

    /// `"{job_title} at {company}"`
    FormatExperience,

    /// `"{degree} - {institution}"`
    FormatEducation,
}

/// Default transform for a canonical path. Only the virtual aggregate keys
/// carry one; plain paths stringify their scalar directly.
pub fn default_transform(path: &str) -> Option<Transform> {
    match path {
        "skills_text" => Some(Transform::JoinSkills),
        "experience_summary" => Some(Transform::FormatExperience),
        "education_summary" => Some(Transform::FormatEducation),
        _ => None,
    }
}

impl Transform {
    /// Apply the transform. Malformed input yields an empty string.
    pub fn apply(self, value: &Value) -> String {
        match self {
            Transform::JoinSkills => join_skills(value),
            Transform::FormatExperience => format_experience(value),
            Transform::FormatEducation => format_education(value),
        }
    }
}

/// Join each category's `items` with ", ", then join the categories.
fn join_skills(value: &Value) -> String {
    let Some(categories) = value.as_array() else {
        return String::new();
    };

    let mut groups = Vec::new();
    for category in categories {
        let Some(items) = category.get("items").and_then(Value::as_array) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }

        // A non-string item makes the whole category list malformed.
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(s) => names.push(s),
                None => return String::new(),
            }
        }
        groups.push(names.join(", "));
    }

    groups.join(", ")
}

fn format_experience(value: &Value) -> String {
    let Some(entry) = value.as_object() else {
        return String::new();
    };
    let job_title = string_field(entry, "job_title");
    let company = string_field(entry, "company");
    format!("{job_title} at {company}")
}

fn format_education(value: &Value) -> String {
    let Some(entry) = value.as_object() else {
        return String::new();
    };
    let degree = string_field(entry, "degree");
    let institution = string_field(entry, "institution");
    format!("{degree} - {institution}")
}

/// Missing or non-string fields render as empty segments.
fn string_field<'a>(entry: &'a serde_json::Map<String, Value>, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_skills() {
        let value = json!([
            {"category": "Programming", "items": ["Python", "JavaScript", "React"]},
            {"category": "Databases", "items": ["SQL"]}
        ]);
        assert_eq!(
            Transform::JoinSkills.apply(&value),
            "Python, JavaScript, React, SQL"
        );
    }

    #[test]
    fn test_join_skills_skips_empty_categories() {
        let value = json!([
            {"items": []},
            {"items": ["Go"]},
            {"category": "no items key"}
        ]);
        assert_eq!(Transform::JoinSkills.apply(&value), "Go");
    }

    #[test]
    fn test_join_skills_malformed_input() {
        assert_eq!(Transform::JoinSkills.apply(&json!({"items": ["Go"]})), "");
        assert_eq!(Transform::JoinSkills.apply(&json!([{"items": [1, 2]}])), "");
        assert_eq!(Transform::JoinSkills.apply(&json!("not a list")), "");
    }

    #[test]
    fn test_format_experience() {
        let value = json!({"job_title": "Senior Developer", "company": "Tech Corp"});
        assert_eq!(
            Transform::FormatExperience.apply(&value),
            "Senior Developer at Tech Corp"
        );
    }

    #[test]
    fn test_format_experience_missing_fields() {
        let value = json!({"company": "Acme"});
        assert_eq!(Transform::FormatExperience.apply(&value), " at Acme");
        assert_eq!(Transform::FormatExperience.apply(&json!([1])), "");
    }

    #[test]
    fn test_format_education() {
        let value = json!({"degree": "BSc", "institution": "MIT"});
        assert_eq!(Transform::FormatEducation.apply(&value), "BSc - MIT");
    }

    #[test]
    fn test_default_transform_table() {
        assert_eq!(default_transform("skills_text"), Some(Transform::JoinSkills));
        assert_eq!(
            default_transform("experience_summary"),
            Some(Transform::FormatExperience)
        );
        assert_eq!(
            default_transform("education_summary"),
            Some(Transform::FormatEducation)
        );
        assert_eq!(default_transform("personal_info.email"), None);
    }
}
