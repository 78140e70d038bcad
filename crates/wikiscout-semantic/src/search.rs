use crate::embeddings::EmbeddingGenerator;
use crate::error::{Result, SemanticError};
use crate::index::VectorIndex;
use crate::models::{IndexStats, SearchResult, SemanticConfig};
use crate::tfidf::TfIdfIndex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wikiscout_core::models::ChunkRecord;

/// Search engine over the chunked corpus
///
/// Owns the embedding model, the vector index, the TF-IDF baseline, and a
/// chunk-id → record cache so search hits come back with their parent
/// article's title and URL attached.
pub struct SearchEngine {
    /// Embedding generator
    embedder: Arc<EmbeddingGenerator>,

    /// Vector index
    index: Arc<RwLock<VectorIndex>>,

    /// Configuration
    config: SemanticConfig,

    /// Chunk records by id, for result assembly
    records: Arc<RwLock<HashMap<String, ChunkRecord>>>,

    /// TF-IDF baseline, built when the corpus is loaded
    baseline: Arc<RwLock<Option<TfIdfIndex>>>,
}

impl SearchEngine {
    /// Create a new search engine.
    ///
    /// Loads the persisted vector index when one exists, otherwise starts
    /// with an empty one. The embedding model is not touched until
    /// `initialize()`.
    pub fn new(config: SemanticConfig) -> Result<Self> {
        let embedder = Arc::new(EmbeddingGenerator::new(config.model.clone()));

        let index_path = PathBuf::from(&config.index_path);

        let index = match VectorIndex::load(index_path.clone(), embedder.dimension()) {
            Ok(idx) => {
                info!("Loaded existing vector index ({} chunks)", idx.len());
                idx
            }
            Err(e) => {
                warn!("Could not load existing index: {}. Creating new one.", e);
                VectorIndex::new(embedder.dimension(), config.model.clone(), index_path)?
            }
        };

        Ok(Self {
            embedder,
            index: Arc::new(RwLock::new(index)),
            config,
            records: Arc::new(RwLock::new(HashMap::new())),
            baseline: Arc::new(RwLock::new(None)),
        })
    }

    /// Initialize the embedding model
    pub async fn initialize(&self) -> Result<()> {
        self.embedder.initialize().await
    }

    /// Load the chunked corpus: fills the record cache and builds the
    /// TF-IDF baseline. Call this before searching.
    pub async fn load_corpus(&self, records: Vec<ChunkRecord>) -> Result<()> {
        info!("Loading corpus: {} chunks", records.len());

        let tfidf = TfIdfIndex::new(&records);

        let mut cache = self.records.write().await;
        cache.clear();
        for record in records {
            cache.insert(record.id.clone(), record);
        }

        *self.baseline.write().await = Some(tfidf);

        Ok(())
    }

    /// Embed chunk records in batches, add them to the vector index, and
    /// persist the index. Returns the number of chunks indexed.
    pub async fn index_records(&self, records: &[ChunkRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        info!("Indexing {} chunks...", records.len());

        let batch_size = self.config.batch_size.max(1);
        let mut indexed = 0usize;

        for batch in records.chunks(batch_size) {
            let entries = self.embedder.embed_records(batch).await?;
            let count = entries.len();

            let mut index = self.index.write().await;
            index.add_batch(entries)?;
            indexed += count;

            debug!("Indexed {}/{} chunks", indexed, records.len());
        }

        self.save().await?;

        info!("Successfully indexed {} chunks", indexed);
        Ok(indexed)
    }

    /// Semantic search: embed the query, find nearest chunks, attach record
    /// metadata. Results below `min_similarity` are dropped; the rest come
    /// back sorted by similarity, descending.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        debug!("Semantic search query: {}", query);

        let query_vector = self.embedder.embed_query(query).await?;

        let index = self.index.read().await;
        let raw_results = index.search(&query_vector, limit)?;

        let filtered: Vec<_> = raw_results
            .into_iter()
            .filter(|(_, similarity)| *similarity >= self.config.min_similarity)
            .collect();

        debug!("Found {} results above threshold", filtered.len());

        let cache = self.records.read().await;
        let mut results = Vec::new();

        for (chunk_id, similarity) in filtered {
            if let Some(record) = cache.get(&chunk_id) {
                results.push(SearchResult {
                    record: record.clone(),
                    similarity,
                    distance: 1.0 - similarity,
                });
            } else {
                warn!("Chunk {} not found in record cache", chunk_id);
            }
        }

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.config.max_results.min(limit));

        Ok(results)
    }

    /// TF-IDF baseline search over the loaded corpus.
    ///
    /// Returns `(record, score)` pairs ranked by cosine similarity,
    /// descending. Needs `load_corpus` to have run first.
    pub async fn search_baseline(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(ChunkRecord, f32)>> {
        debug!("Baseline search query: {}", query);

        let baseline = self.baseline.read().await;
        let tfidf = baseline.as_ref().ok_or(SemanticError::CorpusNotLoaded)?;

        let scored = tfidf.search(query, limit);

        let cache = self.records.read().await;
        let results = scored
            .into_iter()
            .filter_map(|(chunk_id, score)| {
                cache.get(&chunk_id).map(|record| (record.clone(), score))
            })
            .collect();

        Ok(results)
    }

    /// Check if a chunk is in the vector index
    pub async fn is_indexed(&self, chunk_id: &str) -> bool {
        let index = self.index.read().await;
        index.contains(chunk_id)
    }

    /// Get index statistics
    pub async fn stats(&self) -> IndexStats {
        let index = self.index.read().await;
        index.stats().clone()
    }

    /// Get the number of indexed chunks
    pub async fn indexed_count(&self) -> usize {
        let index = self.index.read().await;
        index.len()
    }

    /// Save the vector index to disk
    pub async fn save(&self) -> Result<()> {
        let mut index = self.index.write().await;
        index.save()
    }

    /// Clear the vector index and the record cache
    pub async fn clear(&self) -> Result<()> {
        let mut index = self.index.write().await;
        index.clear()?;

        self.records.write().await.clear();
        *self.baseline.write().await = None;

        Ok(())
    }

    /// Rebuild the vector index from scratch
    pub async fn rebuild(&self, records: Vec<ChunkRecord>) -> Result<usize> {
        info!("Rebuilding vector index...");

        self.clear().await?;
        self.load_corpus(records.clone()).await?;
        let count = self.index_records(&records).await?;

        info!("Index rebuild complete: {} chunks", count);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, text: &str) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            title: "Topic".to_string(),
            text: text.to_string(),
            url: Some("https://en.wikipedia.org/wiki/Topic".to_string()),
        }
    }

    fn engine(temp_dir: &TempDir) -> SearchEngine {
        let config = SemanticConfig {
            index_path: temp_dir.path().join("index").to_string_lossy().to_string(),
            ..Default::default()
        };
        SearchEngine::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_baseline_requires_loaded_corpus() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);

        let result = engine.search_baseline("anything", 5).await;
        assert!(matches!(result, Err(SemanticError::CorpusNotLoaded)));
    }

    #[tokio::test]
    async fn test_baseline_search_ranks_matching_chunk_first() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);

        engine
            .load_corpus(vec![
                record("Ridge_0", "Ridge regression shrinks coefficients with an L2 penalty"),
                record("Tree_0", "Decision trees split the feature space into regions"),
            ])
            .await
            .unwrap();

        let results = engine.search_baseline("ridge regression", 5).await.unwrap();

        assert_eq!(results[0].0.id, "Ridge_0");
        assert!(results[0].1 > results[1].1);
        // Records come back with article metadata attached
        assert_eq!(results[0].0.title, "Topic");
    }

    #[tokio::test]
    async fn test_new_engine_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);

        assert_eq!(engine.indexed_count().await, 0);
        assert!(!engine.is_indexed("Topic_0").await);
    }

    #[tokio::test]
    async fn test_clear_drops_corpus_and_baseline() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);

        engine
            .load_corpus(vec![record("Topic_0", "some chunk text")])
            .await
            .unwrap();
        engine.clear().await.unwrap();

        let result = engine.search_baseline("chunk", 5).await;
        assert!(matches!(result, Err(SemanticError::CorpusNotLoaded)));
    }
}
