//! Relationship navigation over an indexed block graph.
//!
//! [`BlockGraph`] is the read-only view every builder and the search matcher
//! work through. All lookups tolerate an inconsistent graph: ids that do not
//! resolve are dropped and missing relationships read as empty.

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{BlockIndex, IndexCache, SnapshotKey};
use crate::model::{AnalysisPayload, Block, BlockType, Document};

/// A document snapshot paired with its block index.
#[derive(Debug, Clone)]
pub struct BlockGraph<'a> {
    document: &'a Document,
    analysis: &'a AnalysisPayload,
    index: Arc<BlockIndex>,
    config: EngineConfig,
}

impl<'a> BlockGraph<'a> {
    /// Open a graph, reusing a cached index for this snapshot when possible.
    pub fn new(document: &'a Document, cache: &mut IndexCache) -> Result<Self> {
        let config = *cache.config();
        let index = cache.get_or_build(document)?;
        Self::from_parts(document, index, config)
    }

    /// Open a graph with a freshly built index and the default configuration.
    pub fn build(document: &'a Document) -> Result<Self> {
        Self::with_config(document, EngineConfig::default())
    }

    /// Open a graph with a freshly built index.
    pub fn with_config(document: &'a Document, config: EngineConfig) -> Result<Self> {
        let index = Arc::new(BlockIndex::build(document)?);
        Self::from_parts(document, index, config)
    }

    fn from_parts(document: &'a Document, index: Arc<BlockIndex>, config: EngineConfig) -> Result<Self> {
        let analysis = document.require_analysis()?;
        debug_assert_eq!(index.key(), &SnapshotKey::of(document));
        Ok(Self {
            document,
            analysis,
            index,
            config,
        })
    }

    /// The underlying document.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The block index.
    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    /// Page count from metadata.
    ///
    /// Chunked documents report the first chunk's count, which can be lower
    /// than the pages their blocks reference.
    pub fn page_count(&self) -> u32 {
        self.index.page_count()
    }

    /// 1-based page numbers `1..=page_count()`.
    pub fn pages(&self) -> RangeInclusive<u32> {
        1..=self.page_count()
    }

    /// Look up a block by id.
    pub fn block(&self, id: &str) -> Option<&'a Block> {
        self.index
            .location(id)
            .and_then(|loc| self.index.resolve(self.analysis, loc))
    }

    /// The PAGE block for 1-based `page_number`.
    ///
    /// Single-page documents have one PAGE without a page number; it is
    /// returned for page 1.
    pub fn page(&self, page_number: u32) -> Option<&'a Block> {
        self.index
            .page_location(page_number)
            .and_then(|loc| self.index.resolve(self.analysis, loc))
    }

    /// Resolve ids to blocks, silently dropping ids that do not resolve.
    pub fn blocks_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&'a Block> {
        ids.iter()
            .filter_map(|id| {
                let block = self.block(id.as_ref());
                if block.is_none() {
                    log::trace!("Dropping dangling block reference '{}'", id.as_ref());
                }
                block
            })
            .collect()
    }

    /// Blocks referenced by the first relationship of `block`.
    pub fn children(&self, block: &Block) -> Vec<&'a Block> {
        self.blocks_by_ids(block.child_ids())
    }

    /// Children of a page with the given type.
    pub fn children_by_type(&self, page_number: u32, block_type: BlockType) -> Vec<&'a Block> {
        let Some(page) = self.page(page_number) else {
            log::trace!("No PAGE block for page {}", page_number);
            return Vec::new();
        };

        self.children(page)
            .into_iter()
            .filter(|b| b.block_type == block_type)
            .collect()
    }

    /// Every block, across chunks, in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &'a Block> + 'a {
        self.analysis.blocks()
    }

    /// Every block of `block_type`, in document order.
    pub fn blocks_of_type(&self, block_type: BlockType) -> impl Iterator<Item = &'a Block> + 'a {
        self.analysis.blocks().filter(move |b| b.block_type == block_type)
    }
}
