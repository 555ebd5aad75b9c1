//! Similarity index over past inputs.
//!
//! Pairs a `TfidfVectorizer` with a `NeighborIndex`. Both halves are always
//! fitted together from the same corpus state; there is no incremental update.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::neighbors::{Neighbor, NeighborIndex, DEFAULT_NEIGHBORS};
use super::vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityIndex {
    vectorizer: TfidfVectorizer,
    neighbors: NeighborIndex,
}

impl SimilarityIndex {
    /// Create an unfitted index
    pub fn new(max_features: usize, k: usize) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(max_features),
            neighbors: NeighborIndex::new(k),
        }
    }

    /// Fit a fresh index over `inputs`, keeping this index's parameters.
    pub fn fitted(&self, inputs: &[String]) -> Self {
        let mut index = Self::new(self.vectorizer.max_features(), self.neighbors.k());
        index.fit(inputs);
        index
    }

    /// Discard any previous fit and rebuild vectorizer and neighbors from `inputs`.
    pub fn fit(&mut self, inputs: &[String]) {
        let rows = self.vectorizer.fit_transform(inputs);
        self.neighbors.fit(rows);
        debug!(
            "Similarity index fitted: {} rows, {} terms",
            self.neighbors.len(),
            self.vectorizer.vocabulary_len()
        );
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }

    /// Nearest corpus row to `text`.
    ///
    /// Returns `None` when the index is unfitted or the query shares no terms
    /// with the vocabulary; callers treat that as "no match" at distance 1.0.
    pub fn lookup(&self, text: &str) -> Option<Neighbor> {
        self.lookup_k(text).into_iter().next()
    }

    /// Up to `k` nearest corpus rows to `text`, nearest first.
    pub fn lookup_k(&self, text: &str) -> Vec<Neighbor> {
        if self.neighbors.is_empty() || !self.vectorizer.is_fitted() {
            return Vec::new();
        }

        let query = self.vectorizer.transform(text);
        if query.iter().all(|x| *x == 0.0) {
            debug!("Degenerate query vector for '{}'", text);
            return Vec::new();
        }

        self.neighbors.kneighbors(&query)
    }
}

impl Default for SimilarityIndex {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES, DEFAULT_NEIGHBORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup_finds_own_row() {
        let corpus = inputs(&[
            "favorite pizza topping",
            "weekend hiking plans",
            "learning rust programming",
        ]);
        let mut index = SimilarityIndex::default();
        index.fit(&corpus);

        for (expected, input) in corpus.iter().enumerate() {
            let neighbor = index.lookup(input).expect("Expected a neighbor");
            assert_eq!(neighbor.index, expected);
            assert!(neighbor.distance < 1e-5);
        }
    }

    #[test]
    fn test_lookup_k_is_bounded() {
        let mut index = SimilarityIndex::new(100, 2);
        index.fit(&inputs(&["pizza night", "pizza lunch", "pizza party"]));

        assert_eq!(index.lookup_k("pizza").len(), 2);
    }

    #[test]
    fn test_unfitted_lookup_is_none() {
        let index = SimilarityIndex::default();
        assert!(index.lookup("anything").is_none());
    }

    #[test]
    fn test_degenerate_query_is_none() {
        let mut index = SimilarityIndex::default();
        index.fit(&inputs(&["pizza night"]));

        assert!(index.lookup("the and of").is_none());
        assert!(index.lookup("bicycle").is_none());
    }

    #[test]
    fn test_refit_replaces_vocabulary() {
        let mut index = SimilarityIndex::default();
        index.fit(&inputs(&["pizza night"]));
        index.fit(&inputs(&["guitar practice"]));

        assert!(index.lookup("pizza").is_none());
        assert_eq!(index.lookup("guitar").map(|n| n.index), Some(0));
    }
}
