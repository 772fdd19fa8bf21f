//! Display content of form values and table cells.
//!
//! A value or cell points at WORD and SELECTION_ELEMENT blocks. Words are
//! joined into text; a selection element turns the whole field into a
//! checkbox.

use std::fmt;

use crate::graph::BlockGraph;
use crate::model::{Block, BlockType, SelectionStatus};

/// Content of a value or cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldContent {
    /// Space-joined word text
    Text(String),
    /// Checkbox state
    Checkbox(bool),
}

impl FieldContent {
    /// Interpret resolved content blocks.
    ///
    /// If any block is a selection element the field is a checkbox whose
    /// state is that of the first selection element; word text is then
    /// ignored.
    pub fn from_blocks(blocks: &[&Block]) -> Self {
        if let Some(selection) = blocks
            .iter()
            .find(|b| b.block_type == BlockType::SelectionElement)
        {
            return FieldContent::Checkbox(selection.selection_status == Some(SelectionStatus::Selected));
        }

        let words: Vec<&str> = blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Word)
            .map(|b| b.text())
            .collect();
        FieldContent::Text(words.join(" "))
    }

    /// Whether the field is a checkbox.
    pub fn is_checkbox(&self) -> bool {
        matches!(self, FieldContent::Checkbox(_))
    }
}

impl fmt::Display for FieldContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldContent::Text(text) => f.write_str(text),
            FieldContent::Checkbox(true) => f.write_str("Yes"),
            FieldContent::Checkbox(false) => f.write_str("No"),
        }
    }
}

/// Typed content of the blocks behind `ids`.
pub fn field_content<S: AsRef<str>>(graph: &BlockGraph<'_>, ids: &[S]) -> FieldContent {
    FieldContent::from_blocks(&graph.blocks_by_ids(ids))
}

/// Display string of the blocks behind `ids`: joined words, or `"Yes"`/`"No"`
/// for checkboxes. An empty id list gives an empty string.
pub fn cell_or_value_contents<S: AsRef<str>>(graph: &BlockGraph<'_>, ids: &[S]) -> String {
    if ids.is_empty() {
        return String::new();
    }
    field_content(graph, ids).to_string()
}
