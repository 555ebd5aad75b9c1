//! TF-IDF text vectorizer over unigrams and bigrams.
//!
//! Fitting builds a vocabulary from a corpus of documents: tokens are
//! lower-cased words of two or more characters, English stopwords are
//! removed, and adjacent remaining tokens form bigrams. When the vocabulary
//! exceeds `max_features`, the terms with the highest corpus frequency are
//! kept (ties resolved alphabetically). Vectors are raw term counts weighted
//! by smoothed IDF and L2-normalized.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

/// Default cap on vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 100;

/// Stopwords for English
const STOPWORDS_EN: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done",
    "down", "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "get", "give", "go", "had", "has", "have", "having", "he",
    "hence", "her", "here", "hereafter", "hereby", "herein", "hers", "herself", "him", "himself",
    "his", "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself",
    "just", "keep", "last", "latter", "least", "less", "ll", "made", "many", "may", "me",
    "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "much", "must", "my",
    "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody", "none",
    "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once",
    "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves",
    "out", "over", "own", "per", "perhaps", "please", "put", "rather", "re", "same", "see",
    "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so", "some",
    "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too", "toward",
    "towards", "under", "until", "up", "upon", "us", "ve", "very", "via", "was", "we", "well",
    "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS_EN.iter().copied().collect());

// NOTE: the pattern is a literal known to compile.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid regex: token pattern"));

/// Split text into lower-cased, stopword-filtered unigrams followed by bigrams.
fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !STOPWORDS.contains(word))
        .collect();

    let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

fn count_terms(terms: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    /// Term to column index, columns assigned in alphabetical order.
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column.
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Number of terms kept after fitting.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    #[cfg(test)]
    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Learn vocabulary and IDF from `documents`, then return their vectors.
    ///
    /// Any previous fit is discarded. A corpus made only of stopwords yields
    /// an empty vocabulary and all-zero vectors.
    pub fn fit_transform(&mut self, documents: &[String]) -> Vec<Vec<f32>> {
        let doc_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| count_terms(analyze(doc)))
            .collect();

        let mut corpus_freq: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for counts in &doc_counts {
            for (term, count) in counts {
                let entry = corpus_freq.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        // BTreeMap iteration is alphabetical; a stable sort keeps that order for ties.
        let mut ranked: Vec<(&str, usize, usize)> = corpus_freq
            .into_iter()
            .map(|(term, (total, df))| (term, total, df))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n_docs = documents.len() as f32;
        self.vocabulary = ranked
            .iter()
            .enumerate()
            .map(|(idx, (term, _, _))| (term.to_string(), idx))
            .collect();
        self.idf = ranked
            .iter()
            .map(|(_, _, df)| ((1.0 + n_docs) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();

        doc_counts.iter().map(|counts| self.weigh(counts)).collect()
    }

    /// Vectorize a single text with the fitted vocabulary.
    ///
    /// Out-of-vocabulary terms are ignored; a text with no known terms maps to
    /// the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        self.weigh(&count_terms(analyze(text)))
    }

    fn weigh(&self, counts: &HashMap<String, usize>) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for (term, count) in counts {
            if let Some(&idx) = self.vocabulary.get(term) {
                vector[idx] = *count as f32 * self.idf[idx];
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stopword_filtering() {
        let terms = analyze("What are you doing with the guitar");
        assert_eq!(terms, vec!["guitar".to_string()]);
    }

    #[test]
    fn test_bigrams_skip_stopwords() {
        let terms = analyze("pizza and pasta tonight");
        assert!(terms.contains(&"pizza pasta".to_string()));
        assert!(terms.contains(&"pasta tonight".to_string()));
        assert_eq!(terms.len(), 5);
    }

    #[test]
    fn test_single_character_tokens_dropped() {
        assert!(analyze("x y z").is_empty());
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut vectorizer = TfidfVectorizer::new(2);
        vectorizer.fit_transform(&docs(&["coffee coffee tea", "coffee juice", "tea"]));

        assert_eq!(vectorizer.vocabulary_len(), 2);
        assert!(vectorizer.contains_term("coffee"));
        assert!(vectorizer.contains_term("tea"));
        assert!(!vectorizer.contains_term("juice"));
    }

    #[test]
    fn test_vectors_are_normalized() {
        let mut vectorizer = TfidfVectorizer::default();
        let rows = vectorizer.fit_transform(&docs(&["guitar lessons", "piano lessons"]));

        for row in rows {
            let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unknown_terms_give_zero_vector() {
        let mut vectorizer = TfidfVectorizer::default();
        vectorizer.fit_transform(&docs(&["guitar lessons"]));

        let vector = vectorizer.transform("completely unrelated words");
        assert!(vector.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_stopword_only_corpus() {
        let mut vectorizer = TfidfVectorizer::default();
        let rows = vectorizer.fit_transform(&docs(&["how are you", "what do you do"]));

        assert!(!vectorizer.is_fitted());
        assert!(rows.iter().all(|row| row.is_empty()));
    }
}
