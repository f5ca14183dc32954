//! Form field descriptors and mapping results.
//!
//! A `FieldDescriptor` is the immutable input for one detected form control.
//! Classification and extraction produce a `MappingReport` that accounts for
//! every input field exactly once.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::extract::Transform;

/// Textual attributes of a single detected form control.
///
/// Only `name` and `field_type` are required; everything else is whatever
/// the form detector managed to scrape from the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The form control's `name` attribute
    #[serde(default)]
    pub name: String,

    /// The form control's `type` attribute (text, email, tel, ...)
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,

    /// Visible label text, if one was associated with the control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// The control's `id` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// React `className` prop
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// HTML `class` attribute
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub class_attr: Option<String>,
}

fn default_field_type() -> String {
    "text".to_string()
}

impl FieldDescriptor {
    /// Create a descriptor with just a name and type (tests, simple callers)
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    /// All non-empty textual attributes joined into one search string.
    ///
    /// This is the text the pattern classifier scores against.
    pub fn combined_text(&self) -> String {
        let parts = [
            Some(self.name.as_str()),
            self.id.as_deref(),
            self.placeholder.as_deref(),
            self.label.as_deref(),
            self.class_name.as_deref(),
            self.class_attr.as_deref(),
        ];

        parts
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Name + label + placeholder, lower-cased, for learned-mapping similarity
    pub fn learning_text(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.label.as_deref().unwrap_or(""),
            self.placeholder.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }
}

/// Outcome of classifying one field against the pattern families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Canonical path into the CV record, or `None` if nothing matched
    pub path: Option<String>,

    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl ClassificationResult {
    /// The "no family matched" result
    pub fn none() -> Self {
        Self {
            path: None,
            confidence: 0.0,
        }
    }
}

/// A confident field-to-CV-path association, before value extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    /// The form field's name attribute
    pub field_name: String,

    /// Canonical path into the CV record
    pub cv_path: String,

    /// Default transform for this path, if the path resolves to a composite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,

    /// Classifier confidence in [0, 1]
    pub confidence: f64,
}

/// One successfully extracted value in a `MappingReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedValue {
    pub field_name: String,
    pub cv_path: String,
    pub value: String,
    pub confidence: f64,
}

/// A field that could not be mapped, echoed back for the caller's UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    pub placeholder: String,
}

impl From<&FieldDescriptor> for UnmappedField {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            label: field.label.clone().unwrap_or_default(),
            placeholder: field.placeholder.clone().unwrap_or_default(),
        }
    }
}

/// Result of mapping a batch of fields against a CV record.
///
/// `mappings` and `unmapped_fields` partition the input by field name;
/// `confidence_scores` has an entry for every field that was classified
/// above the threshold, whether or not a value was extracted for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingReport {
    pub mappings: Vec<MappedValue>,
    pub unmapped_fields: Vec<UnmappedField>,
    pub confidence_scores: HashMap<String, f64>,
}
