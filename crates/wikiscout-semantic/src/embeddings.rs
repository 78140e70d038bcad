use crate::error::{Result, SemanticError};
use crate::models::EmbeddingEntry;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wikiscout_core::models::ChunkRecord;

/// Rough token budget for the embedding model (BERT-family limit)
const MAX_TOKENS: usize = 512;

/// Embedding generator using fastembed
///
/// The model is loaded lazily behind an explicit `initialize()` call, so a
/// failed download or a missing ONNX runtime surfaces as a recoverable
/// error instead of poisoning the whole process at import time.
pub struct EmbeddingGenerator {
    /// The underlying embedding model
    model: Arc<RwLock<Option<TextEmbedding>>>,

    /// Model name
    model_name: String,

    /// Vector dimension
    dimension: usize,
}

impl EmbeddingGenerator {
    /// Create a new embedding generator (lazy initialization)
    pub fn new(model_name: String) -> Self {
        // Determine dimension based on model
        let dimension = match model_name.as_str() {
            "sentence-transformers/all-MiniLM-L6-v2" => 384,
            "BAAI/bge-small-en-v1.5" => 384,
            "BAAI/bge-base-en-v1.5" => 768,
            _ => 384, // default
        };

        Self {
            model: Arc::new(RwLock::new(None)),
            model_name,
            dimension,
        }
    }

    /// Initialize the model (downloads if needed)
    pub async fn initialize(&self) -> Result<()> {
        let mut model_guard = self.model.write().await;

        if model_guard.is_some() {
            debug!("Embedding model already initialized");
            return Ok(());
        }

        info!("Initializing embedding model: {}", self.model_name);

        let model_type = match self.model_name.as_str() {
            "sentence-transformers/all-MiniLM-L6-v2" => EmbeddingModel::AllMiniLML6V2,
            "BAAI/bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
            "BAAI/bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
            _ => {
                warn!(
                    "Unknown model {}, defaulting to all-MiniLM-L6-v2",
                    self.model_name
                );
                EmbeddingModel::AllMiniLML6V2
            }
        };

        let init_options = InitOptions::new(model_type).with_show_download_progress(true);

        let embedding_model = TextEmbedding::try_new(init_options)
            .map_err(|e| SemanticError::ModelLoadError(e.to_string()))?;

        *model_guard = Some(embedding_model);

        info!("Embedding model initialized successfully");
        Ok(())
    }

    /// Get the vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Generate embedding for a single text
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        if self.model.read().await.is_none() {
            self.initialize().await?;
        }

        let model_guard = self.model.read().await;
        let model = model_guard
            .as_ref()
            .ok_or(SemanticError::ModelNotInitialized)?;

        let embeddings = model
            .embed(vec![text.to_string()], None)
            .map_err(|e| SemanticError::EmbeddingError(e.to_string()))?;

        if embeddings.is_empty() {
            return Err(SemanticError::EmbeddingError(
                "No embeddings generated".to_string(),
            ));
        }

        Ok(embeddings[0].clone())
    }

    /// Generate embeddings for multiple texts in batch
    pub async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        debug!("embed_batch called with {} texts", texts.len());

        if self.model.read().await.is_none() {
            self.initialize().await?;
        }

        let model_guard = self.model.read().await;
        let model = model_guard
            .as_ref()
            .ok_or(SemanticError::ModelNotInitialized)?;

        let embeddings = model
            .embed(texts, None)
            .map_err(|e| SemanticError::EmbeddingError(e.to_string()))?;
        debug!("model.embed() returned {} embeddings", embeddings.len());

        Ok(embeddings)
    }

    /// Generate embedding entries for a batch of chunk records.
    ///
    /// Records with empty text are skipped; each text is truncated to the
    /// model's token window before embedding.
    pub async fn embed_records(&self, records: &[ChunkRecord]) -> Result<Vec<EmbeddingEntry>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut source_texts = Vec::new();
        let mut chunk_ids = Vec::new();

        for record in records {
            let text = truncate_to_tokens(&record.text, MAX_TOKENS);
            if !text.is_empty() {
                source_texts.push(text);
                chunk_ids.push(record.id.clone());
            }
        }

        if source_texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.embed_batch(source_texts.clone()).await?;

        let entries = vectors
            .into_iter()
            .zip(source_texts)
            .zip(chunk_ids)
            .map(|((vector, source_text), chunk_id)| {
                EmbeddingEntry::new(chunk_id, vector, source_text)
            })
            .collect();

        Ok(entries)
    }

    /// Generate embedding for a search query
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let query = truncate_to_tokens(query.trim(), MAX_TOKENS);

        if query.is_empty() {
            return Err(SemanticError::EmbeddingError(
                "Empty query".to_string(),
            ));
        }

        self.embed_text(&query).await
    }
}

/// Truncate text to approximately N tokens
/// (word-based approximation: 1 token ~= 1 word for English)
fn truncate_to_tokens(text: &str, max_tokens: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= max_tokens {
        return text.to_string();
    }

    words[..max_tokens].join(" ")
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Convert cosine similarity to distance (for consistency with the index)
pub fn similarity_to_distance(similarity: f32) -> f32 {
    1.0 - similarity
}

/// Convert distance to similarity score
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 - distance
}
