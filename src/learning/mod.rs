//! Per-domain learning from corrections and successful fills.

mod engine;
mod similarity;

pub use engine::LearningEngine;
pub use similarity::similarity_score;
