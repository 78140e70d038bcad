use crate::error::{Result, SemanticError};
use crate::models::{EmbeddingEntry, IndexStats};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use usearch::ffi::{IndexOptions, MetricKind, ScalarKind};
use usearch::Index as USearchIndex;

/// Vector index over chunk embeddings, backed by usearch
///
/// The cosine metric means search results come back with a distance in
/// [0, 2]; callers see similarity as `1 - distance`.
pub struct VectorIndex {
    /// usearch index for fast similarity search
    index: USearchIndex,

    /// Mapping from usearch internal key to chunk id
    key_to_chunk: HashMap<u64, String>,

    /// Mapping from chunk id to usearch internal key
    chunk_to_key: HashMap<String, u64>,

    /// Metadata for each chunk (source text, timestamps, text hash)
    metadata: HashMap<String, EmbeddingEntry>,

    /// Next available key
    next_key: u64,

    /// Vector dimension
    dimension: usize,

    /// Index statistics
    stats: IndexStats,

    /// Path where the index is stored
    index_path: PathBuf,
}

fn index_options(dimension: usize) -> IndexOptions {
    IndexOptions {
        dimensions: dimension,
        metric: MetricKind::Cos, // Cosine similarity
        quantization: ScalarKind::F32,
        connectivity: 16, // HNSW connectivity parameter
        expansion_add: 128,
        expansion_search: 64,
        ..Default::default()
    }
}

impl VectorIndex {
    /// Create a new empty vector index
    pub fn new(dimension: usize, model_name: String, index_path: PathBuf) -> Result<Self> {
        let index = USearchIndex::new(&index_options(dimension)).map_err(|e| {
            SemanticError::IndexError(format!("Failed to create usearch index: {}", e))
        })?;

        Ok(Self {
            index,
            key_to_chunk: HashMap::new(),
            chunk_to_key: HashMap::new(),
            metadata: HashMap::new(),
            next_key: 0,
            dimension,
            stats: IndexStats::new(model_name, dimension),
            index_path,
        })
    }

    /// Get the vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get index statistics
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Add a chunk embedding to the index.
    ///
    /// Re-adding an existing chunk id updates its vector in place.
    pub fn add(&mut self, entry: EmbeddingEntry) -> Result<()> {
        if entry.vector.len() != self.dimension {
            return Err(SemanticError::IndexError(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.dimension,
                entry.vector.len()
            )));
        }

        let chunk_id = entry.chunk_id.clone();

        if let Some(&existing_key) = self.chunk_to_key.get(&chunk_id) {
            debug!("Updating existing entry for {}", chunk_id);
            // usearch has no in-place update: remove the old vector for this
            // key, then re-add under the same key.
            self.index
                .remove(existing_key)
                .map_err(|e| SemanticError::IndexError(e.to_string()))?;
            self.index
                .add(existing_key, &entry.vector)
                .map_err(|e| SemanticError::IndexError(e.to_string()))?;
        } else {
            // usearch does not grow its capacity on demand
            if self.index.size() >= self.index.capacity() {
                let new_capacity = (self.index.capacity() * 2).max(64);
                self.index
                    .reserve(new_capacity)
                    .map_err(|e| SemanticError::IndexError(e.to_string()))?;
            }

            let key = self.next_key;
            self.index
                .add(key, &entry.vector)
                .map_err(|e| SemanticError::IndexError(e.to_string()))?;

            self.key_to_chunk.insert(key, chunk_id.clone());
            self.chunk_to_key.insert(chunk_id.clone(), key);
            self.next_key += 1;
        }

        self.metadata.insert(chunk_id, entry);

        Ok(())
    }

    /// Add multiple chunk embeddings in batch
    pub fn add_batch(&mut self, entries: Vec<EmbeddingEntry>) -> Result<()> {
        let needed = self.metadata.len() + entries.len();
        if needed > self.index.capacity() {
            self.index
                .reserve(needed)
                .map_err(|e| SemanticError::IndexError(e.to_string()))?;
        }

        for entry in entries {
            self.add(entry)?;
        }
        Ok(())
    }

    /// Remove a chunk from the index
    pub fn remove(&mut self, chunk_id: &str) -> Result<()> {
        if let Some(&key) = self.chunk_to_key.get(chunk_id) {
            self.index
                .remove(key)
                .map_err(|e| SemanticError::IndexError(e.to_string()))?;

            self.key_to_chunk.remove(&key);
            self.chunk_to_key.remove(chunk_id);
            self.metadata.remove(chunk_id);

            Ok(())
        } else {
            Err(SemanticError::ChunkNotFound {
                chunk_id: chunk_id.to_string(),
            })
        }
    }

    /// Search for the k nearest chunks.
    ///
    /// Returns `(chunk_id, similarity)` pairs with similarity computed as
    /// `1 - distance` for the cosine metric.
    pub fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<(String, f32)>> {
        if query_vector.len() != self.dimension {
            return Err(SemanticError::SearchError(format!(
                "Query vector dimension mismatch: expected {}, got {}",
                self.dimension,
                query_vector.len()
            )));
        }

        let results = self
            .index
            .search(query_vector, k)
            .map_err(|e| SemanticError::SearchError(e.to_string()))?;

        let mut output = Vec::new();
        for (key, distance) in results.keys.iter().zip(results.distances.iter()) {
            if let Some(chunk_id) = self.key_to_chunk.get(key) {
                let similarity = 1.0 - distance;
                output.push((chunk_id.clone(), similarity));
            }
        }

        Ok(output)
    }

    /// Get metadata for a chunk
    pub fn get_metadata(&self, chunk_id: &str) -> Option<&EmbeddingEntry> {
        self.metadata.get(chunk_id)
    }

    /// Get the number of chunks in the index
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Check if a chunk is in the index
    pub fn contains(&self, chunk_id: &str) -> bool {
        self.chunk_to_key.contains_key(chunk_id)
    }

    /// Get all chunk ids in the index
    pub fn chunk_ids(&self) -> Vec<String> {
        self.chunk_to_key.keys().cloned().collect()
    }

    /// Save the index to disk
    pub fn save(&mut self) -> Result<()> {
        info!("Saving vector index to {:?}", self.index_path);

        if let Some(parent) = self.index_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&self.index_path)?;

        // usearch index file
        let index_file = self.index_path.join("index.usearch");
        self.index
            .save(&index_file.to_string_lossy())
            .map_err(|e| SemanticError::IndexError(format!("Failed to save index: {}", e)))?;

        // Metadata as MessagePack
        let metadata_file = self.index_path.join("metadata.msgpack");
        let metadata_data = rmp_serde::to_vec(&self.metadata).map_err(|e| {
            SemanticError::SerializationError(format!("Failed to serialize metadata: {}", e))
        })?;
        std::fs::write(&metadata_file, metadata_data)?;

        // Key mappings
        let mappings_file = self.index_path.join("mappings.json");
        let mappings = serde_json::json!({
            "key_to_chunk": self.key_to_chunk,
            "chunk_to_key": self.chunk_to_key,
            "next_key": self.next_key,
        });
        std::fs::write(&mappings_file, serde_json::to_string_pretty(&mappings)?)?;

        // Update and save stats
        let index_size = Self::calculate_index_size(&self.index_path)?;
        self.stats.update(self.len(), index_size);

        let stats_file = self.index_path.join("stats.json");
        std::fs::write(&stats_file, serde_json::to_string_pretty(&self.stats)?)?;

        info!("Vector index saved successfully");
        Ok(())
    }

    /// Load the index from disk
    pub fn load(index_path: PathBuf, dimension: usize) -> Result<Self> {
        info!("Loading vector index from {:?}", index_path);

        if !index_path.exists() {
            return Err(SemanticError::IndexNotFound {
                path: index_path.to_string_lossy().to_string(),
            });
        }

        let index_file = index_path.join("index.usearch");
        if !index_file.exists() {
            return Err(SemanticError::CorruptedIndex);
        }

        let index = USearchIndex::new(&index_options(dimension))
            .and_then(|mut idx| {
                idx.load(&index_file.to_string_lossy())?;
                Ok(idx)
            })
            .map_err(|e| SemanticError::IndexError(format!("Failed to load index: {}", e)))?;

        let metadata_file = index_path.join("metadata.msgpack");
        if !metadata_file.exists() {
            return Err(SemanticError::CorruptedIndex);
        }
        let metadata_data = std::fs::read(&metadata_file)?;
        let metadata: HashMap<String, EmbeddingEntry> = rmp_serde::from_slice(&metadata_data)
            .map_err(|e| {
                SemanticError::SerializationError(format!("Failed to deserialize metadata: {}", e))
            })?;

        let mappings_file = index_path.join("mappings.json");
        if !mappings_file.exists() {
            return Err(SemanticError::CorruptedIndex);
        }
        let mappings_data = std::fs::read_to_string(&mappings_file)?;
        let mappings: serde_json::Value = serde_json::from_str(&mappings_data)?;

        let key_to_chunk: HashMap<u64, String> =
            serde_json::from_value(mappings["key_to_chunk"].clone()).map_err(|e| {
                SemanticError::SerializationError(format!(
                    "Failed to deserialize key_to_chunk: {}",
                    e
                ))
            })?;

        let chunk_to_key: HashMap<String, u64> =
            serde_json::from_value(mappings["chunk_to_key"].clone()).map_err(|e| {
                SemanticError::SerializationError(format!(
                    "Failed to deserialize chunk_to_key: {}",
                    e
                ))
            })?;

        let next_key: u64 = mappings["next_key"].as_u64().unwrap_or(0);

        let stats_file = index_path.join("stats.json");
        let stats = if stats_file.exists() {
            let stats_data = std::fs::read_to_string(&stats_file)?;
            serde_json::from_str(&stats_data)?
        } else {
            IndexStats::new("unknown".to_string(), dimension)
        };

        info!("Vector index loaded: {} chunks", metadata.len());

        Ok(Self {
            index,
            key_to_chunk,
            chunk_to_key,
            metadata,
            next_key,
            dimension,
            stats,
            index_path,
        })
    }

    /// Calculate total index size on disk
    fn calculate_index_size(path: &Path) -> Result<u64> {
        let mut total_size = 0u64;

        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let metadata = entry.metadata()?;
                if metadata.is_file() {
                    total_size += metadata.len();
                }
            }
        }

        Ok(total_size)
    }

    /// Clear the entire index
    pub fn clear(&mut self) -> Result<()> {
        self.index = USearchIndex::new(&index_options(self.dimension))
            .map_err(|e| SemanticError::IndexError(format!("Failed to recreate index: {}", e)))?;

        self.key_to_chunk.clear();
        self.chunk_to_key.clear();
        self.metadata.clear();
        self.next_key = 0;

        Ok(())
    }
}
