use serde::{Deserialize, Serialize};

/// A fetched Wikipedia article, exactly as the fetch stage wrote it
///
/// Immutable once written: reruns of the pipeline rewrite the corpus file
/// wholesale rather than mutating individual records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Stable article identifier (topic title with spaces as underscores).
    /// Tolerated as missing in older corpus files.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Canonical page URL, when the source provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Raw page text - no cleaning applied yet
    #[serde(default)]
    pub text: String,
}

/// A paragraph-sized chunk joined back to its parent article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// `<article_id>_<chunk_index>`, unique across the whole corpus because
    /// article ids are unique and the index is monotonic per article
    pub id: String,
    pub title: String,
    /// Cleaned chunk text
    pub text: String,
    /// Parent article URL, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
