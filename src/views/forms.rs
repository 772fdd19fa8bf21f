//! Form key/value pairs.
//!
//! A form field is a pair of KEY_VALUE_SET blocks. The key block's first
//! relationship points at its value block(s), its second at the key's own
//! words; each value block's first relationship points at the value's words
//! or selection element.

use serde::{Deserialize, Serialize};

use super::collect_pages;
use crate::extractors::cell_or_value_contents;
use crate::geometry::BoundingBox;
use crate::graph::BlockGraph;
use crate::model::BlockType;
use crate::utils::safe_float_cmp;

/// A detected form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValuePair {
    /// Id of the key block
    pub id: String,
    /// Key text
    pub key: String,
    /// Value text, or `"Yes"`/`"No"` for checkboxes
    pub value: String,
    /// Position of the key
    pub key_bounding_box: BoundingBox,
    /// Position of the first value block, if it resolved
    pub value_bounding_box: Option<BoundingBox>,
    /// 1-based page number
    pub page_number: u32,
}

/// Key/value pairs of one page in reading order.
///
/// Pairs with neither key nor value text are dropped. The rest are ordered by
/// `top + weight * left` of the key box (weight from
/// [`EngineConfig::reading_order_weight`](crate::config::EngineConfig)).
pub fn page_key_value_pairs(graph: &BlockGraph<'_>, page_number: u32) -> Vec<KeyValuePair> {
    let weight = graph.config().reading_order_weight;

    let mut pairs: Vec<KeyValuePair> = graph
        .children_by_type(page_number, BlockType::KeyValueSet)
        .into_iter()
        .filter(|block| block.is_key())
        .filter_map(|key_block| {
            let value_blocks = graph.blocks_by_ids(key_block.relationship_ids(0));
            let key = cell_or_value_contents(graph, key_block.relationship_ids(1));

            let value_word_ids: Vec<&str> = value_blocks
                .iter()
                .flat_map(|v| v.child_ids().iter().map(String::as_str))
                .collect();
            let value = cell_or_value_contents(graph, &value_word_ids);

            if key.is_empty() && value.is_empty() {
                log::trace!("Skipping empty key/value pair '{}'", key_block.id);
                return None;
            }

            Some(KeyValuePair {
                id: key_block.id.clone(),
                key,
                value,
                key_bounding_box: *key_block.bounding_box(),
                value_bounding_box: value_blocks.first().map(|v| *v.bounding_box()),
                page_number,
            })
        })
        .collect();

    pairs.sort_by(|a, b| {
        safe_float_cmp(
            a.key_bounding_box.reading_order_key(weight),
            b.key_bounding_box.reading_order_key(weight),
        )
    });
    pairs
}

/// Key/value pairs of every page.
pub fn document_key_value_pairs(graph: &BlockGraph<'_>) -> Vec<KeyValuePair> {
    collect_pages(graph, |page| page_key_value_pairs(graph, page))
}

/// Number of key blocks in the whole document, whatever page they are on.
pub fn count_key_value_pairs(graph: &BlockGraph<'_>) -> usize {
    graph
        .blocks_of_type(BlockType::KeyValueSet)
        .filter(|b| b.is_key())
        .count()
}
