//! Pattern-based classification of form fields to canonical CV paths.

mod classifier;
mod patterns;

pub use classifier::classify;
pub use patterns::{pattern_families, PatternFamily, Rule};
