// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # blockview
//!
//! Structural views over document-analysis output: lines, form fields, tables,
//! NLP entities and word-level search highlights, computed from the flat block
//! graph an OCR/analysis service returns.
//!
//! ## Core Features
//!
//! - **Block index**: id → block lookup over single or chunked responses, with
//!   a caller-owned LRU cache keyed by document snapshot
//! - **Views**: per-page and whole-document lines, key/value pairs (with
//!   checkbox values), table grids and entity groups
//! - **Search**: regex or literal matching mapped back to word boxes, merged
//!   into highlight rectangles in reading order
//! - **Redactions**: per-page redaction boxes, filled from saved exclusion lists
//!
//! ## Quick Start
//!
//! ```no_run
//! use blockview::graph::BlockGraph;
//! use blockview::index::IndexCache;
//! use blockview::model::Document;
//! use blockview::views::{document_key_value_pairs, page_tables};
//!
//! # fn main() -> blockview::Result<()> {
//! let json = std::fs::read_to_string("document.json")?;
//! let doc = Document::from_json(&json)?;
//!
//! let mut cache = IndexCache::new();
//! let graph = BlockGraph::new(&doc, &mut cache)?;
//!
//! for pair in document_key_value_pairs(&graph) {
//!     println!("p{} {}: {}", pair.page_number, pair.key, pair.value);
//! }
//! for table in page_tables(&graph, 1) {
//!     println!("{:?}", table.content_grid());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Input model
pub mod geometry;
pub mod model;

// Indexing and navigation
pub mod graph;
pub mod index;

// Content and views
pub mod extractors;
pub mod views;

// Search and redaction
pub mod redaction;
pub mod search;

// Re-exports
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use graph::BlockGraph;
pub use index::{BlockIndex, IndexCache, SnapshotKey};
pub use model::{AnalysisPayload, Block, BlockType, Document, NlpService};
pub use redaction::{RedactionDto, RedactionSet};
pub use search::{HighlightBox, SearchSession};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
