//! Structural views over a block graph.
//!
//! Every view has a per-page builder and a document builder. The document
//! builder walks pages `1..=page_count` and concatenates the per-page results
//! in page order, so it is exactly the flattening of the per-page views.

pub mod entities;
pub mod forms;
pub mod lines;
pub mod tables;

pub use entities::{consolidate_mentions, document_entity_groups, page_entity_groups, EntityGroup};
pub use forms::{count_key_value_pairs, document_key_value_pairs, page_key_value_pairs, KeyValuePair};
pub use lines::{document_lines, page_lines, Line};
pub use tables::{document_tables, page_tables, Table, TableCell};

use crate::graph::BlockGraph;

/// Run a per-page builder over every page and flatten the results.
pub(crate) fn collect_pages<T, F>(graph: &BlockGraph<'_>, per_page: F) -> Vec<T>
where
    F: FnMut(u32) -> Vec<T>,
{
    graph.pages().flat_map(per_page).collect()
}
