//! Document snapshots and analysis payloads.
//!
//! A [`Document`] is one fetched version of a document: its id, the version
//! stamp of the fetch, the analysis payload (single or chunked) and any NLP
//! entity artifacts. A refetch produces a new `Document`; nothing here is
//! mutated in place.

use std::io::Read;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::entities::{EntityArtifact, NlpService};
use crate::error::{Error, Result};

/// Document-level metadata of an analysis response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    /// Number of pages analysed
    pub pages: u32,
}

/// One analysis job's output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisResponse {
    /// All blocks, in service order
    pub blocks: Vec<Block>,
    /// Page metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,
}

impl AnalysisResponse {
    /// Create a response from blocks and a page count.
    pub fn new(blocks: Vec<Block>, pages: u32) -> Self {
        Self {
            blocks,
            document_metadata: Some(DocumentMetadata { pages }),
        }
    }

    /// Page count from the metadata, zero when absent.
    ///
    /// Loading rejects a payload whose page-count response lacks metadata.
    pub fn page_count(&self) -> u32 {
        self.document_metadata.map(|m| m.pages).unwrap_or(0)
    }
}

/// Analysis output: one response, or several chunks of one large document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    /// A single response
    Single(AnalysisResponse),
    /// Responses of several jobs, logically concatenated
    Chunked(Vec<AnalysisResponse>),
}

impl<'de> Deserialize<'de> for AnalysisPayload {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Branch on the JSON shape so a broken chunk reports its real cause
        // instead of "did not match any variant".
        let value = serde_json::Value::deserialize(deserializer)?;
        let payload = match value {
            serde_json::Value::Array(chunks) => chunks
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    serde_json::from_value(chunk)
                        .map_err(|e| de::Error::custom(format!("chunk {}: {}", i, e)))
                })
                .collect::<std::result::Result<Vec<_>, D::Error>>()
                .map(AnalysisPayload::Chunked)?,
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(AnalysisPayload::Single)
                .map_err(<D::Error as de::Error>::custom)?,
            other => {
                return Err(de::Error::custom(format!(
                    "analysis response must be an object or an array of objects, found {}",
                    json_kind(&other)
                )))
            },
        };
        payload
            .check_page_metadata()
            .map_err(<D::Error as de::Error>::custom)?;
        Ok(payload)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl AnalysisPayload {
    /// The responses making up this payload.
    pub fn chunks(&self) -> &[AnalysisResponse] {
        match self {
            AnalysisPayload::Single(response) => std::slice::from_ref(response),
            AnalysisPayload::Chunked(chunks) => chunks,
        }
    }

    /// Whether the payload is split across several jobs.
    pub fn is_chunked(&self) -> bool {
        matches!(self, AnalysisPayload::Chunked(_))
    }

    /// Page count from metadata.
    ///
    /// For chunked payloads only the first chunk's metadata is read.
    pub fn page_count(&self) -> u32 {
        self.chunks().first().map(AnalysisResponse::page_count).unwrap_or(0)
    }

    /// The response the page count is read from must carry `DocumentMetadata`.
    ///
    /// Later chunks may omit it.
    fn check_page_metadata(&self) -> std::result::Result<(), String> {
        match self {
            AnalysisPayload::Single(response) if response.document_metadata.is_none() => {
                Err("missing field `DocumentMetadata`".to_string())
            },
            AnalysisPayload::Chunked(chunks) => match chunks.first() {
                None => Err("chunked analysis response has no chunks".to_string()),
                Some(first) if first.document_metadata.is_none() => {
                    Err("chunk 0: missing field `DocumentMetadata`".to_string())
                },
                Some(_) => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// All blocks across chunks, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.chunks().iter().flat_map(|c| c.blocks.iter())
    }
}

/// A fetched document snapshot.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document id
    #[serde(alias = "documentId")]
    pub id: String,

    /// Version stamp of the fetch that produced this snapshot
    #[serde(
        default,
        rename = "textractFetchedAt",
        deserialize_with = "deserialize_version"
    )]
    pub fetched_at: String,

    /// Block graph from the analysis service
    #[serde(default, rename = "textractResponse")]
    pub analysis: Option<AnalysisPayload>,

    /// General entity recognition output
    #[serde(default, alias = "comprehendRespone")]
    pub comprehend_response: Option<EntityArtifact>,

    /// Medical entity recognition output
    #[serde(default, alias = "comprehendMedicalRespone")]
    pub comprehend_medical_response: Option<EntityArtifact>,

    /// PII detection output
    #[serde(default, rename = "comprehendPIIResponse")]
    pub comprehend_pii_response: Option<EntityArtifact>,

    /// Barcode detection output, passed through untouched
    #[serde(default)]
    pub barcode_response: Option<serde_json::Value>,
}

/// Accept string, numeric or null version stamps.
fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

impl Document {
    /// Create a document snapshot from an analysis payload.
    pub fn new(id: impl Into<String>, fetched_at: impl Into<String>, analysis: AnalysisPayload) -> Self {
        Self {
            id: id.into(),
            fetched_at: fetched_at.into(),
            analysis: Some(analysis),
            ..Default::default()
        }
    }

    /// Attach an entity artifact for `service`.
    pub fn with_entities(mut self, service: NlpService, artifact: EntityArtifact) -> Self {
        match service {
            NlpService::Comprehend => self.comprehend_response = Some(artifact),
            NlpService::ComprehendMedical => self.comprehend_medical_response = Some(artifact),
            NlpService::ComprehendPii => self.comprehend_pii_response = Some(artifact),
        }
        self
    }

    /// Parse a document from a JSON string.
    ///
    /// Structurally wrong input (for example a response without `Blocks`)
    /// fails with [`Error::MalformedDocument`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(classify_json_error)
    }

    /// Parse a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(classify_json_error)
    }

    /// Parse a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(classify_json_error)
    }

    /// The analysis payload, or [`Error::MissingAnalysis`].
    pub fn require_analysis(&self) -> Result<&AnalysisPayload> {
        self.analysis.as_ref().ok_or_else(|| Error::MissingAnalysis {
            document_id: self.id.clone(),
        })
    }

    /// The entity artifact produced by `service`, if any.
    pub fn entity_artifact(&self, service: NlpService) -> Option<&EntityArtifact> {
        match service {
            NlpService::Comprehend => self.comprehend_response.as_ref(),
            NlpService::ComprehendMedical => self.comprehend_medical_response.as_ref(),
            NlpService::ComprehendPii => self.comprehend_pii_response.as_ref(),
        }
    }

    /// Barcode detection output, unchanged.
    pub fn barcodes(&self) -> Option<&serde_json::Value> {
        self.barcode_response.as_ref()
    }
}

fn classify_json_error(err: serde_json::Error) -> Error {
    match err.classify() {
        serde_json::error::Category::Data => Error::MalformedDocument(err.to_string()),
        _ => Error::Json(err),
    }
}
