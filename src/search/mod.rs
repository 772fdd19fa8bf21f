//! Text search over page words, returning highlight boxes.
//!
//! Search is driven by compiled patterns from three sources:
//! - a free-text query ([`query_patterns`])
//! - entity values, matched literally ([`literal_patterns`])
//! - saved exclusion lists ([`ExclusionList`])
//!
//! ## Example
//!
//! ```no_run
//! use blockview::graph::BlockGraph;
//! use blockview::model::Document;
//! use blockview::search::{match_words, query_patterns};
//!
//! # fn main() -> blockview::Result<()> {
//! let doc = Document::from_reader(std::fs::File::open("document.json")?)?;
//! let graph = BlockGraph::build(&doc)?;
//!
//! for hit in match_words(&graph, 1, &query_patterns("total due")?) {
//!     println!("'{}' at ({}, {})", hit.text, hit.left, hit.top);
//! }
//! # Ok(())
//! # }
//! ```

mod patterns;
mod session;
mod text_search;

pub use patterns::{
    build_pattern, escape_literal, exclusion_patterns, literal_patterns, query_patterns, ExclusionItem,
    ExclusionKind, ExclusionList, SearchOptions,
};
pub use session::SearchSession;
pub use text_search::{match_document, match_words, HighlightBox};
