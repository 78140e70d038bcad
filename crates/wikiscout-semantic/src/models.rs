use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wikiscout_core::models::ChunkRecord;

/// Embedding entry for one chunk record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingEntry {
    /// Chunk identifier (`<article_id>_<index>`)
    pub chunk_id: String,

    /// Embedding vector (384 dimensions for all-MiniLM-L6-v2)
    #[serde(skip)]
    pub vector: Vec<f32>,

    /// When this embedding was generated
    pub generated_at: DateTime<Utc>,

    /// Source text that was embedded
    pub source_text: String,

    /// Text hash to detect changes
    pub text_hash: u64,
}

impl EmbeddingEntry {
    /// Create a new embedding entry
    pub fn new(chunk_id: String, vector: Vec<f32>, source_text: String) -> Self {
        let text_hash = hash_text(&source_text);

        Self {
            chunk_id,
            vector,
            generated_at: Utc::now(),
            source_text,
            text_hash,
        }
    }

    /// Check if the source text has changed since this entry was generated
    pub fn text_changed(&self, new_text: &str) -> bool {
        hash_text(new_text) != self.text_hash
    }
}

fn hash_text(text: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// One semantic search hit
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk with its parent-article metadata
    pub record: ChunkRecord,

    /// Cosine similarity in [-1, 1], higher is better
    pub similarity: f32,

    /// Cosine distance as reported by the index (`1 - similarity`)
    pub distance: f32,
}

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of chunks indexed
    pub total_chunks: usize,

    /// Index size in bytes
    pub index_size_bytes: u64,

    /// Last time the index was updated
    pub last_updated: DateTime<Utc>,

    /// Embedding model name
    pub model_name: String,

    /// Vector dimension
    pub dimension: usize,

    /// Index creation time
    pub created_at: DateTime<Utc>,
}

impl IndexStats {
    /// Create new index stats
    pub fn new(model_name: String, dimension: usize) -> Self {
        Self {
            total_chunks: 0,
            index_size_bytes: 0,
            last_updated: Utc::now(),
            model_name,
            dimension,
            created_at: Utc::now(),
        }
    }

    /// Update stats after indexing
    pub fn update(&mut self, chunk_count: usize, size_bytes: u64) {
        self.total_chunks = chunk_count;
        self.index_size_bytes = size_bytes;
        self.last_updated = Utc::now();
    }
}

/// Configuration for the retrieval layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    /// Embedding model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Minimum similarity for a semantic hit to be returned
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,

    /// Maximum results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Embedding batch size
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Directory where the vector index is persisted
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            min_similarity: default_min_similarity(),
            max_results: default_max_results(),
            batch_size: default_batch_size(),
            index_path: default_index_path(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_min_similarity() -> f32 {
    0.0
}

fn default_max_results() -> usize {
    50
}

fn default_batch_size() -> usize {
    64
}

fn default_index_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from(".data"))
        .join("wikiscout")
        .join("index")
        .to_string_lossy()
        .to_string()
}
