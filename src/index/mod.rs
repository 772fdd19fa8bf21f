//! Id index over a document's block graph.
//!
//! [`BlockIndex`] turns the flat block list (concatenated across chunks) into
//! constant-time id lookups. It records where each block lives instead of
//! cloning it, so an index is only meaningful next to the snapshot it was
//! built from; [`SnapshotKey`] ties the two together.

mod cache;

pub use cache::{CacheStats, IndexCache};

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{AnalysisPayload, Block, BlockType, Document};

/// Identity of one fetched version of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    /// Document id
    pub document_id: String,
    /// Fetch version stamp
    pub fetched_at: String,
}

impl SnapshotKey {
    /// Create a key.
    pub fn new(document_id: impl Into<String>, fetched_at: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            fetched_at: fetched_at.into(),
        }
    }

    /// Key of a document snapshot.
    pub fn of(document: &Document) -> Self {
        Self::new(document.id.as_str(), document.fetched_at.as_str())
    }
}

/// Position of a block inside an [`AnalysisPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLocation {
    /// Index of the chunk (always 0 for single responses)
    pub chunk: usize,
    /// Index of the block within the chunk
    pub offset: usize,
}

/// Id → block index for one document snapshot.
#[derive(Debug, Clone)]
pub struct BlockIndex {
    key: SnapshotKey,
    locations: HashMap<String, BlockLocation>,
    pages: HashMap<u32, BlockLocation>,
    page_count: u32,
    max_page: Option<u32>,
    chunked: bool,
}

impl BlockIndex {
    /// Index every block of `document`.
    ///
    /// Fails only when the document has no analysis payload. When two blocks
    /// share an id the later one wins.
    pub fn build(document: &Document) -> Result<Self> {
        let analysis = document.require_analysis()?;

        let capacity = analysis.chunks().iter().map(|c| c.blocks.len()).sum();
        let mut locations = HashMap::with_capacity(capacity);
        let mut pages = HashMap::new();
        let mut max_page: Option<u32> = None;

        for (chunk, response) in analysis.chunks().iter().enumerate() {
            for (offset, block) in response.blocks.iter().enumerate() {
                let location = BlockLocation { chunk, offset };
                locations.insert(block.id.clone(), location);

                if let Some(page) = block.page {
                    max_page = Some(max_page.map_or(page, |m| m.max(page)));
                }

                // Single-page documents carry one untagged PAGE, which is page 1.
                if block.block_type == BlockType::Page {
                    pages.entry(block.page.unwrap_or(1)).or_insert(location);
                }
            }
        }

        let page_count = analysis.page_count();
        if analysis.is_chunked() {
            if let Some(max) = max_page.filter(|&m| m > page_count) {
                log::warn!(
                    "Document '{}': first chunk reports {} pages but blocks reference page {}",
                    document.id,
                    page_count,
                    max
                );
            }
        }

        log::debug!(
            "Indexed {} blocks ({} pages) for document '{}' @ '{}'",
            locations.len(),
            pages.len(),
            document.id,
            document.fetched_at
        );

        Ok(Self {
            key: SnapshotKey::of(document),
            locations,
            pages,
            page_count,
            max_page,
            chunked: analysis.is_chunked(),
        })
    }

    /// The snapshot this index was built from.
    pub fn key(&self) -> &SnapshotKey {
        &self.key
    }

    /// Location of the block with `id`.
    pub fn location(&self, id: &str) -> Option<BlockLocation> {
        self.locations.get(id).copied()
    }

    /// Location of the PAGE block for 1-based `page`.
    pub fn page_location(&self, page: u32) -> Option<BlockLocation> {
        self.pages.get(&page).copied()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the index holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Page count from metadata (first chunk only for chunked payloads).
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Largest `Page` carried by any block.
    pub fn max_page(&self) -> Option<u32> {
        self.max_page
    }

    /// Whether the indexed payload was chunked.
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    /// Resolve a location against the payload the index was built from.
    pub fn resolve<'a>(&self, analysis: &'a AnalysisPayload, location: BlockLocation) -> Option<&'a Block> {
        analysis
            .chunks()
            .get(location.chunk)
            .and_then(|c| c.blocks.get(location.offset))
    }
}
