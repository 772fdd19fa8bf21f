//! Raw text lines.

use serde::{Deserialize, Serialize};

use super::collect_pages;
use crate::geometry::BoundingBox;
use crate::graph::BlockGraph;
use crate::model::BlockType;

/// A line of text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Line text
    pub text: String,
    /// 1-based page number
    pub page_number: u32,
    /// Position on the page
    pub bounding_box: BoundingBox,
}

/// Lines of one page, in service order.
pub fn page_lines(graph: &BlockGraph<'_>, page_number: u32) -> Vec<Line> {
    graph
        .children_by_type(page_number, BlockType::Line)
        .into_iter()
        .map(|block| Line {
            text: block.text().to_string(),
            page_number,
            bounding_box: *block.bounding_box(),
        })
        .collect()
}

/// Lines of every page.
pub fn document_lines(graph: &BlockGraph<'_>) -> Vec<Line> {
    collect_pages(graph, |page| page_lines(graph, page))
}
