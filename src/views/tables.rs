//! Tables and their cell grids.

use serde::{Deserialize, Serialize};

use super::collect_pages;
use crate::extractors::cell_or_value_contents;
use crate::geometry::{BoundingBox, Geometry};
use crate::graph::BlockGraph;
use crate::model::{Block, BlockType};

/// A table cell.
///
/// Spans are recorded as given; a spanning cell still occupies a single slot
/// of [`Table::rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// 1-based row
    pub row_index: u32,
    /// 1-based column
    pub column_index: u32,
    /// Rows spanned
    pub row_span: u32,
    /// Columns spanned
    pub column_span: u32,
    /// Cell text, or `"Yes"`/`"No"` for checkboxes
    pub content: String,
    /// Cell geometry
    pub geometry: Geometry,
}

/// A table on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Id of the TABLE block
    pub id: String,
    /// Position of the table
    pub bounding_box: BoundingBox,
    /// 1-based page number
    pub page_number: u32,
    /// Cells indexed by `[row - 1][column - 1]`; slots no cell claimed are `None`
    pub rows: Vec<Vec<Option<TableCell>>>,
}

impl Table {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at 0-based `row` and `column`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(Option::as_ref)
    }

    /// Cell contents as a grid of strings, empty where no cell exists.
    pub fn content_grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(|c| c.content.clone()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

fn table_cell(graph: &BlockGraph<'_>, block: &Block) -> Option<TableCell> {
    let (Some(row_index), Some(column_index)) = (block.row_index, block.column_index) else {
        log::debug!("Cell '{}' has no row/column index", block.id);
        return None;
    };
    if row_index == 0 || column_index == 0 {
        log::debug!("Cell '{}' has a zero row/column index", block.id);
        return None;
    }

    Some(TableCell {
        row_index,
        column_index,
        row_span: block.row_span.unwrap_or(1),
        column_span: block.column_span.unwrap_or(1),
        content: cell_or_value_contents(graph, block.child_ids()),
        geometry: block.geometry,
    })
}

fn build_table(graph: &BlockGraph<'_>, table: &Block, page_number: u32) -> Table {
    let cells: Vec<TableCell> = graph
        .children(table)
        .into_iter()
        .filter(|b| b.block_type == BlockType::Cell)
        .filter_map(|b| table_cell(graph, b))
        .collect();

    // Each row and column is covered by at least one cell, so the grid cannot
    // extend past what the cells' spans add up to.
    let limit = cells.len() as u64;
    let max_row: u64 = cells.iter().map(|c| u64::from(c.row_span.max(1)).min(limit)).sum();
    let max_column: u64 = cells.iter().map(|c| u64::from(c.column_span.max(1)).min(limit)).sum();
    let mut rows: Vec<Vec<Option<TableCell>>> = Vec::new();

    for cell in cells {
        if u64::from(cell.row_index) > max_row || u64::from(cell.column_index) > max_column {
            log::debug!(
                "Cell at ({}, {}) lies outside the {}x{} extent of table '{}'",
                cell.row_index,
                cell.column_index,
                max_row,
                max_column,
                table.id
            );
            continue;
        }

        let r = (cell.row_index - 1) as usize;
        let c = (cell.column_index - 1) as usize;
        if rows.len() <= r {
            rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut rows[r];
        if row.len() <= c {
            row.resize_with(c + 1, || None);
        }
        row[c] = Some(cell);
    }

    Table {
        id: table.id.clone(),
        bounding_box: *table.bounding_box(),
        page_number,
        rows,
    }
}

/// Tables of one page.
pub fn page_tables(graph: &BlockGraph<'_>, page_number: u32) -> Vec<Table> {
    graph
        .children_by_type(page_number, BlockType::Table)
        .into_iter()
        .map(|table| build_table(graph, table, page_number))
        .collect()
}

/// Tables of every page.
pub fn document_tables(graph: &BlockGraph<'_>) -> Vec<Table> {
    collect_pages(graph, |page| page_tables(graph, page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisPayload, AnalysisResponse, Document, RelationshipType};

    fn cell(id: &str, row: u32, col: u32, word_id: &str) -> Block {
        Block::new(id, BlockType::Cell, BoundingBox::default())
            .with_cell_position(row, col, 1, 1)
            .with_relationship(RelationshipType::Child, [word_id])
    }

    fn word(id: &str, text: &str) -> Block {
        Block::new(id, BlockType::Word, BoundingBox::default()).with_text(text)
    }

    fn doc(cells: Vec<Block>, words: Vec<Block>) -> Document {
        let cell_ids: Vec<String> = cells.iter().map(|c| c.id.clone()).collect();
        let page = Block::new("page", BlockType::Page, BoundingBox::default())
            .with_relationship(RelationshipType::Child, ["table"]);
        let table = Block::new("table", BlockType::Table, BoundingBox::new(0.1, 0.1, 0.8, 0.3))
            .with_relationship(RelationshipType::Child, cell_ids);

        let mut blocks = vec![page, table];
        blocks.extend(cells);
        blocks.extend(words);
        Document::new("doc", "1", AnalysisPayload::Single(AnalysisResponse::new(blocks, 1)))
    }

    #[test]
    fn test_two_by_two_grid() {
        let doc = doc(
            vec![
                cell("c4", 2, 2, "d"),
                cell("c1", 1, 1, "a"),
                cell("c3", 2, 1, "c"),
                cell("c2", 1, 2, "b"),
            ],
            vec![word("a", "A"), word("b", "B"), word("c", "C"), word("d", "D")],
        );
        let graph = BlockGraph::build(&doc).unwrap();
        let tables = page_tables(&graph, 1);

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.id, "table");
        assert_eq!(table.content_grid(), vec![vec!["A", "B"], vec!["C", "D"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(1, 0).unwrap().row_index, 2);
    }

    #[test]
    fn test_spanning_cell_occupies_one_slot() {
        let wide = Block::new("wide", BlockType::Cell, BoundingBox::default())
            .with_cell_position(1, 1, 1, 3)
            .with_relationship(RelationshipType::Child, ["a"]);
        let doc = doc(
            vec![wide, cell("c2", 2, 3, "b")],
            vec![word("a", "Header"), word("b", "x")],
        );
        let graph = BlockGraph::build(&doc).unwrap();
        let table = &page_tables(&graph, 1)[0];

        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.cell(0, 0).unwrap().column_span, 3);
        assert_eq!(table.rows[1].len(), 3);
        assert!(table.cell(1, 0).is_none());
        assert_eq!(table.cell(1, 2).unwrap().content, "x");
    }

    #[test]
    fn test_cells_without_index_are_skipped() {
        let mut bad = cell("bad", 1, 1, "a");
        bad.row_index = None;
        let doc = doc(vec![bad, cell("ok", 1, 1, "b")], vec![word("a", "A"), word("b", "B")]);
        let graph = BlockGraph::build(&doc).unwrap();
        let table = &page_tables(&graph, 1)[0];
        assert_eq!(table.content_grid(), vec![vec!["B"]]);
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let doc = doc(
            vec![cell("c1", 1, 1, "a"), cell("far", 4_000_000_000, 1, "b"), cell("wide", 1, 4_000_000_000, "b")],
            vec![word("a", "A"), word("b", "B")],
        );
        let graph = BlockGraph::build(&doc).unwrap();
        let table = &page_tables(&graph, 1)[0];
        assert_eq!(table.content_grid(), vec![vec!["A"]]);
    }

    #[test]
    fn test_document_tables_are_tagged() {
        let doc = doc(vec![cell("c1", 1, 1, "a")], vec![word("a", "A")]);
        let graph = BlockGraph::build(&doc).unwrap();
        let tables = document_tables(&graph);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].page_number, 1);
    }
}
