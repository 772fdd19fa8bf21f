//! Data model of the analysis service output.
//!
//! Field names follow the service's JSON (PascalCase for blocks, camelCase for
//! the document wrapper) so responses deserialize without translation.

mod block;
mod document;
mod entities;

pub use block::{Block, BlockType, Relationship, RelationshipType, SelectionStatus, KEY_ENTITY_TYPE};
pub use document::{AnalysisPayload, AnalysisResponse, Document, DocumentMetadata};
pub use entities::{EntityArtifact, EntityMention, EntityRecord, MergeKey, NlpService};
