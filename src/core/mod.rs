//! Batch orchestration: classification plus extraction over a form.

mod mapper;

pub use mapper::{classify_fields, generate_mapping, generate_mapping_for_domain};
