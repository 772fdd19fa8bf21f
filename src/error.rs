//! Error types for the block graph engine.
//!
//! Sparse input (dangling ids, missing relationships, absent entity artifacts)
//! is never an error: builders return empty results for it. The variants here
//! cover input that is structurally wrong, and user-supplied patterns that
//! cannot be compiled.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or querying a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Document JSON that parsed but does not have the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The document carries no analysis payload at all
    #[error("Document '{document_id}' has no analysis response")]
    MissingAnalysis {
        /// Id of the offending document
        document_id: String,
    },

    /// A user-supplied search pattern failed to compile
    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Unrecognized NLP service name
    #[error("Unknown entity service: {0}")]
    UnknownService(String),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
