//! The trained model triple: corpus, similarity index and style profile.

use serde::{Deserialize, Serialize};

use super::similarity::SimilarityIndex;
use super::style::{StyleProfile, StyleProfiler};
use crate::models::ConversationPair;

/// Immutable snapshot of everything the arbiter reads.
///
/// A new snapshot is built for every train or learn event and swapped in
/// whole, so the index always matches the corpus it was fitted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    corpus: Vec<ConversationPair>,
    index: SimilarityIndex,
    profile: StyleProfile,
}

impl ModelState {
    /// Full training: profile from responses, index from inputs.
    pub fn train(pairs: Vec<ConversationPair>, template: &SimilarityIndex) -> Self {
        let responses: Vec<&str> = pairs.iter().map(|p| p.response.as_str()).collect();
        let profile = StyleProfiler::new().profile(&responses);
        let index = template.fitted(&Self::inputs_of(&pairs));

        Self {
            corpus: pairs,
            index,
            profile,
        }
    }

    /// Snapshot with `pair` appended and the index refitted. The profile is kept as is.
    pub fn learn(&self, pair: ConversationPair) -> Self {
        let mut corpus = self.corpus.clone();
        corpus.push(pair);
        let index = self.index.fitted(&Self::inputs_of(&corpus));

        Self {
            corpus,
            index,
            profile: self.profile.clone(),
        }
    }

    /// Untrained state with an empty corpus.
    pub fn empty(template: &SimilarityIndex) -> Self {
        Self::train(Vec::new(), template)
    }

    fn inputs_of(pairs: &[ConversationPair]) -> Vec<String> {
        pairs.iter().map(|p| p.input.clone()).collect()
    }

    pub fn corpus(&self) -> &[ConversationPair] {
        &self.corpus
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn profile(&self) -> &StyleProfile {
        &self.profile
    }

    /// True when the index rows line up one-to-one with the corpus.
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.corpus.len()
    }
}
