//! Per-page entity records produced by the NLP services.
//!
//! These artifacts sit next to the block graph rather than inside it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The NLP service that produced an entity artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NlpService {
    /// General entity recognition, grouped by `Type`
    Comprehend,
    /// Medical entity recognition, grouped by `Category`
    ComprehendMedical,
    /// PII detection, grouped by `Type`
    ComprehendPii,
}

/// Field of an [`EntityMention`] that entity groups are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKey {
    /// The `Type` field
    Type,
    /// The `Category` field
    Category,
}

impl NlpService {
    /// All supported services.
    pub const ALL: [NlpService; 3] = [
        NlpService::Comprehend,
        NlpService::ComprehendMedical,
        NlpService::ComprehendPii,
    ];

    /// The field this service's mentions are grouped by.
    pub fn merge_key(self) -> MergeKey {
        match self {
            NlpService::ComprehendMedical => MergeKey::Category,
            NlpService::Comprehend | NlpService::ComprehendPii => MergeKey::Type,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            NlpService::Comprehend => "comprehend",
            NlpService::ComprehendMedical => "comprehend-medical",
            NlpService::ComprehendPii => "comprehend-pii",
        }
    }
}

impl fmt::Display for NlpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NlpService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "comprehend" => Ok(NlpService::Comprehend),
            "comprehend-medical" | "medical" => Ok(NlpService::ComprehendMedical),
            "comprehend-pii" | "pii" => Ok(NlpService::ComprehendPii),
            _ => Err(Error::UnknownService(s.to_string())),
        }
    }
}

/// A single detected entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityMention {
    /// Entity type (general and PII services)
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Entity category (medical service)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Covered text
    #[serde(default)]
    pub text: String,
}

impl EntityMention {
    /// Value of the given merge key, if the mention carries it.
    pub fn merge_value(&self, key: MergeKey) -> Option<&str> {
        match key {
            MergeKey::Type => self.entity_type.as_deref(),
            MergeKey::Category => self.category.as_deref(),
        }
    }
}

/// All entities detected on one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityRecord {
    /// 1-based page number
    pub page: u32,
    /// Mentions on the page
    #[serde(default)]
    pub entities: Vec<EntityMention>,
}

/// One service's output for a whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityArtifact {
    /// One record per page
    #[serde(default)]
    pub results: Vec<EntityRecord>,
}

impl EntityArtifact {
    /// The record for `page`, if the service produced one.
    pub fn record_for_page(&self, page: u32) -> Option<&EntityRecord> {
        self.results.iter().find(|r| r.page == page)
    }
}
