//! Style profiling and style application.
//!
//! `StyleProfiler` summarizes how a person writes from the response half of
//! their corpus. `StyleApplier` nudges generated template text toward that
//! profile. Retrieved responses are already in the person's voice and are
//! never passed through the applier.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Average response length reported when no response could be measured.
pub const DEFAULT_RESPONSE_LENGTH: usize = 5;
const TOP_WORDS: usize = 10;

const FORMAL_WORDS: &[&str] = &["however", "therefore", "furthermore", "moreover", "thus"];
const CASUAL_WORDS: &[&str] = &["lol", "haha", "omg", "btw", "imo", "hey", "hi", "yo"];

/// Dominant punctuation habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunctuationStyle {
    /// Uses exclamation marks
    Excited,
    /// Trails off with ellipses
    Thoughtful,
    /// Ends sentences with a period
    Neutral,
    /// Leaves sentences unterminated
    Casual,
}

impl PunctuationStyle {
    /// Classify a single response.
    pub fn of(response: &str) -> Self {
        if response.contains('!') {
            PunctuationStyle::Excited
        } else if response.contains("..") {
            PunctuationStyle::Thoughtful
        } else if response.ends_with('.') {
            PunctuationStyle::Neutral
        } else {
            PunctuationStyle::Casual
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    Formal,
    Casual,
    Neutral,
}

/// Statistical fingerprint of a person's responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Number of responses the profile was computed from; zero means empty.
    pub responses_analyzed: usize,
    /// Up to ten most frequent words with their counts, most frequent first.
    pub common_words: Vec<(String, usize)>,
    pub avg_response_length: usize,
    pub punctuation_style: PunctuationStyle,
    pub formality_level: Formality,
    /// First word of each multi-word response, with counts.
    pub common_starters: BTreeMap<String, usize>,
    /// Last word of each multi-word response, with counts.
    pub common_enders: BTreeMap<String, usize>,
}

impl StyleProfile {
    /// Profile of an empty corpus; applying it changes nothing.
    pub fn empty() -> Self {
        Self {
            responses_analyzed: 0,
            common_words: Vec::new(),
            avg_response_length: DEFAULT_RESPONSE_LENGTH,
            punctuation_style: PunctuationStyle::Neutral,
            formality_level: Formality::Neutral,
            common_starters: BTreeMap::new(),
            common_enders: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.responses_analyzed == 0
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counter that remembers first-seen order, so ties resolve to the earliest key.
struct OrderedCounter<K> {
    counts: Vec<(K, usize)>,
    positions: HashMap<K, usize>,
}

impl<K: Clone + Eq + std::hash::Hash> OrderedCounter<K> {
    fn new() -> Self {
        Self {
            counts: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn add(&mut self, key: K) {
        match self.positions.get(&key) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    /// Keys by descending count; equal counts stay in first-seen order.
    fn most_common(mut self, n: usize) -> Vec<(K, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

/// Computes a `StyleProfile` from past responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleProfiler;

impl StyleProfiler {
    pub fn new() -> Self {
        Self
    }

    /// Build a profile from scratch; nothing is merged with earlier profiles.
    pub fn profile<S: AsRef<str>>(&self, responses: &[S]) -> StyleProfile {
        if responses.is_empty() {
            return StyleProfile::empty();
        }

        let mut words = OrderedCounter::new();
        let mut punctuation = OrderedCounter::new();
        let mut starters = BTreeMap::new();
        let mut enders = BTreeMap::new();
        let mut total_words = 0usize;
        let mut formal_count = 0usize;
        let mut casual_count = 0usize;

        for response in responses {
            let response = response.as_ref();
            let lowered = response.to_lowercase();
            let tokens: Vec<&str> = lowered.split_whitespace().collect();

            total_words += tokens.len();
            for token in &tokens {
                if FORMAL_WORDS.contains(token) {
                    formal_count += 1;
                }
                if CASUAL_WORDS.contains(token) {
                    casual_count += 1;
                }
                words.add(token.to_string());
            }

            punctuation.add(PunctuationStyle::of(response));

            if let [first, .., last] = tokens.as_slice() {
                *starters.entry(first.to_string()).or_insert(0) += 1;
                *enders.entry(last.to_string()).or_insert(0) += 1;
            }
        }

        let punctuation_style = punctuation
            .most_common(1)
            .into_iter()
            .next()
            .map(|(style, _)| style)
            .unwrap_or(PunctuationStyle::Neutral);

        let formality_level = if formal_count > casual_count {
            Formality::Formal
        } else if casual_count > formal_count {
            Formality::Casual
        } else {
            Formality::Neutral
        };

        StyleProfile {
            responses_analyzed: responses.len(),
            common_words: words.most_common(TOP_WORDS),
            avg_response_length: total_words / responses.len(),
            punctuation_style,
            formality_level,
            common_starters: starters,
            common_enders: enders,
        }
    }
}

/// Applies a `StyleProfile` to generated text.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleApplier;

impl StyleApplier {
    pub fn new() -> Self {
        Self
    }

    /// Punctuation pass, then formality pass. Each substitution happens at most once.
    pub fn apply(&self, text: &str, profile: &StyleProfile) -> String {
        if profile.is_empty() {
            return text.to_string();
        }

        let mut styled = match profile.punctuation_style {
            PunctuationStyle::Excited if !text.ends_with('!') => {
                format!("{}!", text.trim_end_matches('.'))
            }
            PunctuationStyle::Thoughtful if !text.contains(&['.', '!', '?'][..]) => {
                format!("{}...", text)
            }
            PunctuationStyle::Casual if text.ends_with('.') => {
                text.trim_end_matches('.').to_string()
            }
            _ => text.to_string(),
        };

        if profile.formality_level == Formality::Casual {
            if styled.starts_with("Hello") {
                styled = styled.replacen("Hello", "Hey", 1);
            }
            if styled.contains("How are you") {
                styled = styled.replacen("How are you", "How are ya", 1);
            }
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_classification() {
        assert_eq!(PunctuationStyle::of("wow!"), PunctuationStyle::Excited);
        assert_eq!(PunctuationStyle::of("hmm... maybe"), PunctuationStyle::Thoughtful);
        assert_eq!(PunctuationStyle::of("Sure."), PunctuationStyle::Neutral);
        assert_eq!(PunctuationStyle::of("sure"), PunctuationStyle::Casual);
        assert_eq!(PunctuationStyle::of("wait.. what!"), PunctuationStyle::Excited);
    }

    #[test]
    fn test_empty_corpus_profile() {
        let profile = StyleProfiler::new().profile::<&str>(&[]);
        assert!(profile.is_empty());
        assert!(profile.common_words.is_empty());
    }

    #[test]
    fn test_profile_statistics() {
        let profile = StyleProfiler::new().profile(&[
            "lol that is wild",
            "haha yes",
            "ok",
        ]);

        assert_eq!(profile.responses_analyzed, 3);
        assert_eq!(profile.avg_response_length, 2);
        assert_eq!(profile.punctuation_style, PunctuationStyle::Casual);
        assert_eq!(profile.formality_level, Formality::Casual);
        assert_eq!(profile.common_starters.get("lol"), Some(&1));
        assert_eq!(profile.common_enders.get("yes"), Some(&1));
        // single-word responses have no starter/ender
        assert!(!profile.common_starters.contains_key("ok"));
    }

    #[test]
    fn test_common_words_tie_break_by_first_seen() {
        let profile = StyleProfiler::new().profile(&["beta alpha", "alpha beta gamma"]);

        let top: Vec<&str> = profile.common_words.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(top, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn test_punctuation_tie_uses_first_class_seen() {
        let profile = StyleProfiler::new().profile(&["fine.", "great!", "ok", "done.", "yay!"]);
        assert_eq!(profile.punctuation_style, PunctuationStyle::Neutral);
    }

    #[test]
    fn test_formal_profile() {
        // words with attached punctuation are not counted
        let profile = StyleProfiler::new().profile(&["however, that is true."]);
        assert_eq!(profile.formality_level, Formality::Neutral);

        let profile = StyleProfiler::new().profile(&["however it works", "thus we proceed"]);
        assert_eq!(profile.formality_level, Formality::Formal);
    }

    fn profile_with(style: PunctuationStyle, formality: Formality) -> StyleProfile {
        StyleProfile {
            responses_analyzed: 1,
            punctuation_style: style,
            formality_level: formality,
            ..StyleProfile::empty()
        }
    }

    #[test]
    fn test_apply_excited() {
        let profile = profile_with(PunctuationStyle::Excited, Formality::Neutral);
        let applier = StyleApplier::new();

        assert_eq!(applier.apply("That's fine.", &profile), "That's fine!");
        assert_eq!(applier.apply("Great!", &profile), "Great!");
        assert_eq!(applier.apply("What's new?", &profile), "What's new?!");
    }

    #[test]
    fn test_apply_thoughtful_and_casual() {
        let applier = StyleApplier::new();

        let thoughtful = profile_with(PunctuationStyle::Thoughtful, Formality::Neutral);
        assert_eq!(applier.apply("I see", &thoughtful), "I see...");
        assert_eq!(applier.apply("I see.", &thoughtful), "I see.");

        let casual = profile_with(PunctuationStyle::Casual, Formality::Neutral);
        assert_eq!(applier.apply("I get it.", &casual), "I get it");
    }

    #[test]
    fn test_apply_casual_formality() {
        let profile = profile_with(PunctuationStyle::Neutral, Formality::Casual);
        let applier = StyleApplier::new();

        assert_eq!(
            applier.apply("Hello! How are you doing?", &profile),
            "Hey! How are ya doing?"
        );
    }

    #[test]
    fn test_neutral_is_identity() {
        let profile = profile_with(PunctuationStyle::Neutral, Formality::Neutral);
        let applier = StyleApplier::new();

        for text in ["Hello.", "wow!", "hmm", "How are you?", ""] {
            assert_eq!(applier.apply(text, &profile), text);
        }
    }

    #[test]
    fn test_empty_profile_is_noop() {
        let applier = StyleApplier::new();
        assert_eq!(applier.apply("That's fine.", &StyleProfile::empty()), "That's fine.");
    }
}
