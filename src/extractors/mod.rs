//! Content extraction from resolved blocks.

pub mod content;

pub use content::{cell_or_value_contents, field_content, FieldContent};
