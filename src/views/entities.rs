//! Entity groups from NLP entity artifacts.
//!
//! Entities do not come from the block graph: each NLP service ships one
//! record per page. Mentions on a page are grouped by the service's merge key
//! and the texts of each group deduplicated.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::collect_pages;
use crate::graph::BlockGraph;
use crate::model::{EntityMention, MergeKey, NlpService};

/// Distinct texts sharing one entity type or category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityGroup {
    /// Merge key value (type or category)
    pub entity: String,
    /// Distinct texts, in first-seen order
    pub value: Vec<String>,
    /// 1-based page number
    pub page_number: u32,
}

/// Group `mentions` by `key`, deduplicating texts.
///
/// Groups and their values keep first-seen order. Mentions that lack the
/// merge key are skipped.
pub fn consolidate_mentions(mentions: &[EntityMention], key: MergeKey, page_number: u32) -> Vec<EntityGroup> {
    let mut groups: IndexMap<&str, IndexSet<&str>> = IndexMap::new();

    for mention in mentions {
        let Some(entity) = mention.merge_value(key) else {
            log::trace!("Skipping entity mention '{}' without {:?}", mention.text, key);
            continue;
        };
        groups.entry(entity).or_default().insert(mention.text.as_str());
    }

    groups
        .into_iter()
        .map(|(entity, values)| EntityGroup {
            entity: entity.to_string(),
            value: values.into_iter().map(str::to_string).collect(),
            page_number,
        })
        .collect()
}

/// Entity groups of one page from `service`'s artifact.
///
/// A missing artifact or a page without a record yields no groups.
pub fn page_entity_groups(graph: &BlockGraph<'_>, page_number: u32, service: NlpService) -> Vec<EntityGroup> {
    let Some(artifact) = graph.document().entity_artifact(service) else {
        log::trace!("No {} artifact on document '{}'", service, graph.document().id);
        return Vec::new();
    };

    match artifact.record_for_page(page_number) {
        Some(record) => consolidate_mentions(&record.entities, service.merge_key(), page_number),
        None => Vec::new(),
    }
}

/// Entity groups of every page from `service`'s artifact.
pub fn document_entity_groups(graph: &BlockGraph<'_>, service: NlpService) -> Vec<EntityGroup> {
    collect_pages(graph, |page| page_entity_groups(graph, page, service))
}
