//! TF-IDF keyword baseline
//!
//! The classic sparse-retrieval baseline the embedding search is measured
//! against: tf-idf weight vectors per chunk, ranked by cosine similarity
//! against the query's vector, descending.

use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;
use wikiscout_core::models::ChunkRecord;

/// TF-IDF index over chunk records
pub struct TfIdfIndex {
    /// Number of documents containing each term
    doc_frequencies: HashMap<String, usize>,

    /// Per-document term counts, parallel to `ids`
    term_counts: Vec<HashMap<String, usize>>,

    /// Chunk ids, in insertion order
    ids: Vec<String>,
}

impl TfIdfIndex {
    /// Build an index from a chunked corpus
    pub fn new(records: &[ChunkRecord]) -> Self {
        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let mut term_counts = Vec::with_capacity(records.len());
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let counts = count_terms(&tokenize(&record.text));
            for term in counts.keys() {
                *doc_frequencies.entry(term.clone()).or_insert(0) += 1;
            }
            term_counts.push(counts);
            ids.push(record.id.clone());
        }

        Self {
            doc_frequencies,
            term_counts,
            ids,
        }
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`.
    /// Unseen terms stay finite instead of blowing up the query vector.
    fn idf(&self, term: &str) -> f32 {
        let n = self.ids.len() as f32;
        let df = *self.doc_frequencies.get(term).unwrap_or(&0) as f32;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }

    /// Turn raw term counts into a tf-idf weight vector
    fn weights(&self, counts: &HashMap<String, usize>) -> HashMap<String, f32> {
        counts
            .iter()
            .map(|(term, &count)| (term.clone(), count as f32 * self.idf(term)))
            .collect()
    }

    /// Rank every document against the query, descending by cosine
    /// similarity of tf-idf vectors. Ties break on chunk id so results are
    /// deterministic.
    pub fn search(&self, query: &str, n_results: usize) -> Vec<(String, f32)> {
        let query_weights = self.weights(&count_terms(&tokenize(query)));
        if query_weights.is_empty() || self.ids.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(String, f32)> = self
            .ids
            .iter()
            .zip(self.term_counts.iter())
            .map(|(id, counts)| {
                let doc_weights = self.weights(counts);
                (id.clone(), sparse_cosine(&query_weights, &doc_weights))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(n_results);

        scored
    }
}

/// Cosine similarity between two sparse weight vectors
fn sparse_cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    let dot: f32 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();

    let norm_a: f32 = a.values().map(|w| w * w).sum::<f32>().sqrt();
    let norm_b: f32 = b.values().map(|w| w * w).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Tokenize text into lowercase terms, dropping single characters
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .unicode_words()
        .filter(|word| word.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn count_terms(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, text: &str) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            title: "Topic".to_string(),
            text: text.to_string(),
            url: None,
        }
    }

    fn corpus() -> Vec<ChunkRecord> {
        vec![
            record("Ridge_0", "Ridge regression shrinks coefficients with an L2 penalty term"),
            record("Tree_0", "Decision trees split the feature space into axis-aligned regions"),
            record("Cluster_0", "K-means clustering assigns points to the nearest centroid"),
        ]
    }

    #[test]
    fn test_query_term_ranks_matching_chunk_first() {
        let index = TfIdfIndex::new(&corpus());
        let results = index.search("what is ridge regression", 3);

        assert_eq!(results[0].0, "Ridge_0");
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_results_sorted_descending() {
        let index = TfIdfIndex::new(&corpus());
        let results = index.search("regression trees", 3);

        for pair in results.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_n_results_caps_output() {
        let index = TfIdfIndex::new(&corpus());
        assert_eq!(index.search("clustering", 2).len(), 2);
        assert_eq!(index.search("clustering", 10).len(), 3);
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let index = TfIdfIndex::new(&corpus());
        assert!(index.search("", 5).is_empty());
        // Single-character tokens are dropped, so this is empty too
        assert!(index.search("a b c", 5).is_empty());
    }

    #[test]
    fn test_empty_corpus_yields_nothing() {
        let index = TfIdfIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.search("anything", 5).is_empty());
    }

    #[test]
    fn test_deterministic_tie_break() {
        let records = vec![
            record("B_0", "identical text content"),
            record("A_0", "identical text content"),
        ];
        let index = TfIdfIndex::new(&records);
        let results = index.search("identical content", 2);

        assert_eq!(results[0].0, "A_0");
        assert_eq!(results[1].0, "B_0");
    }

    #[test]
    fn test_rare_terms_outweigh_common_ones() {
        let records = vec![
            record("Common_0", "model model model training data"),
            record("Rare_0", "model training data with backpropagation"),
        ];
        let index = TfIdfIndex::new(&records);

        let results = index.search("backpropagation", 2);
        assert_eq!(results[0].0, "Rare_0");
        assert!(results[0].1 > 0.0);
        assert_eq!(results[1].1, 0.0);
    }
}
