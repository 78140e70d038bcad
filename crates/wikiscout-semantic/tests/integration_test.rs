// End-to-end retrieval tests that do not need the embedding model: the
// vector index and the TF-IDF baseline are exercised with hand-built
// vectors and a small synthetic corpus.

use tempfile::TempDir;
use wikiscout_core::models::ChunkRecord;
use wikiscout_semantic::{
    cosine_similarity, EmbeddingEntry, SearchEngine, SemanticConfig, TfIdfIndex, VectorIndex,
};

fn record(id: &str, title: &str, text: &str) -> ChunkRecord {
    ChunkRecord {
        id: id.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        url: Some(format!(
            "https://en.wikipedia.org/wiki/{}",
            title.replace(' ', "_")
        )),
    }
}

fn corpus() -> Vec<ChunkRecord> {
    vec![
        record(
            "Ridge_regression_0",
            "Ridge regression",
            "Ridge regression is a method of estimating the coefficients of multiple-regression models with an L2 penalty.",
        ),
        record(
            "Decision_tree_0",
            "Decision tree",
            "A decision tree splits the feature space into axis-aligned regions using a tree of threshold tests.",
        ),
        record(
            "K-means_clustering_0",
            "K-means clustering",
            "K-means clustering partitions observations into k clusters by assigning each point to the nearest centroid.",
        ),
    ]
}

#[test]
fn test_vector_index_round_trip_and_search() {
    let temp_dir = TempDir::new().unwrap();
    let index_path = temp_dir.path().join("index");

    {
        let mut index = VectorIndex::new(4, "test-model".to_string(), index_path.clone()).unwrap();
        index
            .add(EmbeddingEntry::new(
                "Ridge_regression_0".to_string(),
                vec![1.0, 0.0, 0.0, 0.0],
                "ridge regression chunk".to_string(),
            ))
            .unwrap();
        index
            .add(EmbeddingEntry::new(
                "Decision_tree_0".to_string(),
                vec![0.0, 1.0, 0.0, 0.0],
                "decision tree chunk".to_string(),
            ))
            .unwrap();
        index.save().unwrap();
    }

    let index = VectorIndex::load(index_path, 4).unwrap();
    assert_eq!(index.len(), 2);

    // Query close to the ridge vector: ridge wins, similarity is 1 - distance
    let results = index.search(&[0.95, 0.05, 0.0, 0.0], 2).unwrap();
    assert_eq!(results[0].0, "Ridge_regression_0");
    assert!(results[0].1 > results[1].1);
    assert!(results[0].1 > 0.9);
    assert!(results[0].1 <= 1.01);
}

#[test]
fn test_similarity_matches_manual_cosine() {
    let temp_dir = TempDir::new().unwrap();
    let mut index = VectorIndex::new(3, "test-model".to_string(), temp_dir.path().to_path_buf())
        .unwrap();

    let stored = vec![1.0, 1.0, 0.0];
    index
        .add(EmbeddingEntry::new(
            "Topic_0".to_string(),
            stored.clone(),
            "chunk".to_string(),
        ))
        .unwrap();

    let query = vec![1.0, 0.0, 0.0];
    let results = index.search(&query, 1).unwrap();

    let expected = cosine_similarity(&query, &stored);
    assert!((results[0].1 - expected).abs() < 0.01);
}

#[test]
fn test_tfidf_over_corpus() {
    let index = TfIdfIndex::new(&corpus());

    let results = index.search("what is ridge regression", 3);
    assert_eq!(results[0].0, "Ridge_regression_0");

    let results = index.search("nearest centroid clustering", 3);
    assert_eq!(results[0].0, "K-means_clustering_0");
}

#[tokio::test]
async fn test_engine_baseline_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let config = SemanticConfig {
        index_path: temp_dir.path().join("index").to_string_lossy().to_string(),
        ..Default::default()
    };

    let engine = SearchEngine::new(config).unwrap();
    engine.load_corpus(corpus()).await.unwrap();

    let results = engine.search_baseline("decision tree splits", 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0.id, "Decision_tree_0");
    assert_eq!(results[0].0.title, "Decision tree");
    assert!(results[0].1 >= results[1].1);
}
