//! Blocks: the atomic nodes of an analysis result graph.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Geometry};

/// Entity type marking the key side of a `KEY_VALUE_SET` block.
pub const KEY_ENTITY_TYPE: &str = "KEY";

/// The kind of a block.
///
/// Tags the service emits that the engine has no view for deserialize to
/// [`BlockType::Unsupported`]; such blocks are indexed but never selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// A page; its first relationship lists the page's top-level blocks
    Page,
    /// A line of text; its first relationship lists its words
    Line,
    /// A single word
    Word,
    /// One side (key or value) of a detected form field
    KeyValueSet,
    /// A checkbox or radio button
    SelectionElement,
    /// A table; its first relationship lists its cells
    Table,
    /// A table cell; its first relationship lists its words
    Cell,
    /// Any block type without a view
    #[serde(other)]
    Unsupported,
}

/// Status of a selection element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    /// Checked
    Selected,
    /// Unchecked
    NotSelected,
}

/// Kind of a relationship between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Structural containment
    Child,
    /// Key to value link of a form field
    Value,
    /// Any other relationship kind
    #[serde(other)]
    Other,
}

/// An ordered list of block ids attached to a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// Relationship kind
    #[serde(rename = "Type")]
    pub kind: RelationshipType,
    /// Referenced block ids, in service order
    #[serde(default)]
    pub ids: Vec<String>,
}

/// A node of the analysis graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Id, unique within a document
    pub id: String,
    /// Block kind
    pub block_type: BlockType,
    /// Text of WORD and LINE blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Status of SELECTION_ELEMENT blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_status: Option<SelectionStatus>,
    /// Role markers of KEY_VALUE_SET blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<String>,
    /// Outgoing relationships, addressed by position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    /// Page-relative geometry
    pub geometry: Geometry,
    /// 1-based page number; absent on single-page documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// 1-based row of a CELL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
    /// 1-based column of a CELL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,
    /// Rows spanned by a CELL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
    /// Columns spanned by a CELL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<u32>,
}

impl Block {
    /// Create a block with no text, relationships or table coordinates.
    pub fn new(id: impl Into<String>, block_type: BlockType, bounding_box: BoundingBox) -> Self {
        Self {
            id: id.into(),
            block_type,
            text: None,
            selection_status: None,
            entity_types: Vec::new(),
            relationships: Vec::new(),
            geometry: Geometry { bounding_box },
            page: None,
            row_index: None,
            column_index: None,
            row_span: None,
            column_span: None,
        }
    }

    /// Set the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Append a relationship.
    pub fn with_relationship<I, S>(mut self, kind: RelationshipType, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships.push(Relationship {
            kind,
            ids: ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add an entity type marker.
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_types.push(entity_type.into());
        self
    }

    /// Set the selection status.
    pub fn with_selection_status(mut self, status: SelectionStatus) -> Self {
        self.selection_status = Some(status);
        self
    }

    /// Set the table coordinates of a cell.
    pub fn with_cell_position(mut self, row: u32, column: u32, row_span: u32, column_span: u32) -> Self {
        self.row_index = Some(row);
        self.column_index = Some(column);
        self.row_span = Some(row_span);
        self.column_span = Some(column_span);
        self
    }

    /// Bounding box of the block.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.geometry.bounding_box
    }

    /// Text, or the empty string for blocks without text.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether this is the key side of a form field.
    pub fn is_key(&self) -> bool {
        self.block_type == BlockType::KeyValueSet
            && self.entity_types.iter().any(|t| t == KEY_ENTITY_TYPE)
    }

    /// Ids of the relationship at `position`, or an empty slice when absent.
    pub fn relationship_ids(&self, position: usize) -> &[String] {
        self.relationships
            .get(position)
            .map(|r| r.ids.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of the first relationship (children, cells, values or words).
    pub fn child_ids(&self) -> &[String] {
        self.relationship_ids(0)
    }
}
