//! Response Arbiter - decides between reusing a past response and generating one.
//!
//! Per request:
//! 1. Empty corpus or a greeting: generate.
//! 2. Otherwise scan the corpus for a near-identical input (distance 0), then
//!    fall back to the similarity index.
//! 3. Reuse the retrieved response if the reuse policy accepts its distance.
//! 4. Generate: split multi-clause input on " and ", resolve each clause on its
//!    own and join the answers; else classify, pick a template and style it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::intent::InputClassifier;
use super::random::RandomSource;
use super::state::ModelState;
use super::style::StyleApplier;
use super::templates::TemplateResponder;
use crate::models::{Reply, ReplySource};

/// Distance reported when nothing could be retrieved.
pub const NO_MATCH_DISTANCE: f32 = 1.0;

const QUESTION_MARKERS: &[&str] = &["what", "how", "why", "when", "where", "which", "who", "?"];
const CLAUSE_MARKERS: &[&str] = &[" and ", " also ", " plus ", " furthermore ", " moreover "];
/// Clauses this short (in characters) are not resolved on their own.
const MIN_CLAUSE_CHARS: usize = 3;
/// Split point for clauses. Detection is case-insensitive, splitting is not.
const CLAUSE_SPLIT: &str = " and ";

// NOTE: the pattern is a literal known to compile.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Invalid regex: punctuation pattern"));

/// Distance thresholds for reusing a retrieved response. Comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReusePolicy {
    /// Applies when the input looks like a question.
    pub question_threshold: f32,
    /// Applies to every other input.
    pub statement_threshold: f32,
}

impl Default for ReusePolicy {
    fn default() -> Self {
        Self {
            question_threshold: 0.6,
            statement_threshold: 0.8,
        }
    }
}

impl ReusePolicy {
    pub fn is_question(text: &str) -> bool {
        let lowered = text.to_lowercase();
        QUESTION_MARKERS.iter().any(|marker| lowered.contains(marker))
    }

    /// Whether a retrieved neighbor at `distance` may be reused for `text`.
    /// Greetings are excluded before this is consulted.
    pub fn accepts(&self, text: &str, distance: f32) -> bool {
        if Self::is_question(text) {
            distance < self.question_threshold
        } else {
            distance < self.statement_threshold
        }
    }
}

/// A corpus response found for an input.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval<'a> {
    pub response: &'a str,
    pub source: ReplySource,
    pub distance: f32,
}

fn strip_punctuation(text: &str) -> String {
    PUNCTUATION.replace_all(text, "").trim().to_string()
}

/// Case- and punctuation-insensitive equality or containment, either way.
pub fn is_very_similar(a: &str, b: &str) -> bool {
    let a = strip_punctuation(&a.to_lowercase());
    let b = strip_punctuation(&b.to_lowercase());

    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

/// Top-level response policy.
#[derive(Debug, Clone, Default)]
pub struct ResponseArbiter {
    classifier: InputClassifier,
    templates: TemplateResponder,
    applier: StyleApplier,
    policy: ReusePolicy,
}

impl ResponseArbiter {
    pub fn new(policy: ReusePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &ReusePolicy {
        &self.policy
    }

    /// Produce the reply for a full request.
    pub fn respond(&self, state: &ModelState, text: &str, rng: &mut dyn RandomSource) -> Reply {
        self.resolve(state, text, rng, true)
    }

    fn resolve(
        &self,
        state: &ModelState,
        text: &str,
        rng: &mut dyn RandomSource,
        split_clauses: bool,
    ) -> Reply {
        if !state.corpus().is_empty() && !self.classifier.is_greeting(text) {
            if let Some(found) = self.retrieve(state, text) {
                if self.policy.accepts(text, found.distance) {
                    debug!(
                        "Reusing {} response at distance {:.3}",
                        found.source.label(),
                        found.distance
                    );
                    return Reply::new(found.response, found.source);
                }
                debug!(
                    "Rejected {} response at distance {:.3}",
                    found.source.label(),
                    found.distance
                );
            } else {
                debug!("No retrievable response (distance {:.1})", NO_MATCH_DISTANCE);
            }
        }

        self.generate(state, text, rng, split_clauses)
    }

    /// Exact scan first, then nearest neighbor.
    pub fn retrieve<'a>(&self, state: &'a ModelState, text: &str) -> Option<Retrieval<'a>> {
        if let Some(pair) = state
            .corpus()
            .iter()
            .find(|pair| is_very_similar(text, &pair.input))
        {
            return Some(Retrieval {
                response: &pair.response,
                source: ReplySource::Personal,
                distance: 0.0,
            });
        }

        let neighbor = state.index().lookup(text)?;
        let pair = state.corpus().get(neighbor.index)?;
        Some(Retrieval {
            response: &pair.response,
            source: ReplySource::SimilarPersonal,
            distance: neighbor.distance,
        })
    }

    fn generate(
        &self,
        state: &ModelState,
        text: &str,
        rng: &mut dyn RandomSource,
        split_clauses: bool,
    ) -> Reply {
        if split_clauses {
            if let Some(combined) = self.combine_clauses(state, text, rng) {
                return combined;
            }
        }

        let category = self.classifier.classify(text);
        let template = self.templates.respond(category, rng);
        debug!("Generated {} template", category);
        Reply::new(
            self.applier.apply(template, state.profile()),
            ReplySource::Generated,
        )
    }

    /// Resolve each " and " clause separately; `None` unless at least two answered.
    fn combine_clauses(
        &self,
        state: &ModelState,
        text: &str,
        rng: &mut dyn RandomSource,
    ) -> Option<Reply> {
        let lowered = text.to_lowercase();
        if !CLAUSE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return None;
        }

        let responses: Vec<String> = text
            .split(CLAUSE_SPLIT)
            .map(str::trim)
            .filter(|clause| clause.chars().count() > MIN_CLAUSE_CHARS)
            .map(|clause| self.resolve(state, clause, rng, false).text)
            .collect();

        if responses.len() < 2 {
            return None;
        }

        debug!("Combined {} clause responses", responses.len());
        Some(Reply::new(
            self.templates.combine(&responses, rng),
            ReplySource::Combined,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::random::FixedRandom;
    use crate::brain::similarity::SimilarityIndex;
    use crate::models::ConversationPair;

    fn state(pairs: &[(&str, &str)]) -> ModelState {
        let pairs = pairs
            .iter()
            .map(|(i, r)| ConversationPair::new(*i, *r))
            .collect();
        ModelState::train(pairs, &SimilarityIndex::default())
    }

    #[test]
    fn test_policy_boundaries() {
        let policy = ReusePolicy::default();

        assert!(!policy.accepts("what is this?", 0.6));
        assert!(policy.accepts("what is this?", 0.599999));
        assert!(!policy.accepts("tell me a story", 0.8));
        assert!(policy.accepts("tell me a story", 0.799999));
    }

    #[test]
    fn test_very_similar() {
        assert!(is_very_similar("How are you?", "how are you"));
        assert!(is_very_similar("how are you doing today", "How are you"));
        assert!(!is_very_similar("pizza", "guitar"));
        assert!(!is_very_similar("?!", "anything"));
    }

    #[test]
    fn test_exact_match_reuses_response() {
        let state = state(&[
            ("how are you", "I'm doing great!"),
            ("what do you do", "I write code"),
        ]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "How are you?", &mut FixedRandom(0));
        assert_eq!(reply, Reply::new("I'm doing great!", ReplySource::Personal));
    }

    #[test]
    fn test_neighbor_reuse() {
        let state = state(&[
            ("favorite pizza topping", "pineapple obviously"),
            ("weekend hiking plans", "the mountains"),
        ]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "pizza topping debate", &mut FixedRandom(0));
        assert_eq!(reply.text, "pineapple obviously");
        assert_eq!(reply.source, ReplySource::SimilarPersonal);
    }

    #[test]
    fn test_greeting_never_retrieves() {
        let state = state(&[("hi", "yo what's good")]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "hi", &mut FixedRandom(0));
        assert_eq!(reply.source, ReplySource::Generated);
        assert_ne!(reply.text, "yo what's good");
    }

    #[test]
    fn test_empty_corpus_generates() {
        let state = state(&[]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "hi", &mut FixedRandom(0));
        assert_eq!(reply, Reply::new("Hey there! How's it going?", ReplySource::Generated));
    }

    #[test]
    fn test_clauses_are_combined() {
        let state = state(&[]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "I ate lunch and how are you", &mut FixedRandom(0));
        assert_eq!(reply.source, ReplySource::Combined);
        assert_eq!(
            reply.text,
            "Nice! What did you have to eat? and also I see what you mean!"
        );
    }

    #[test]
    fn test_uppercase_and_is_detected_but_not_split() {
        let state = state(&[]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "I ate lunch AND how are you", &mut FixedRandom(0));
        assert_eq!(reply.source, ReplySource::Generated);
        assert_eq!(reply.text, "Nice! What did you have to eat?");
    }

    #[test]
    fn test_other_markers_do_not_split() {
        let state = state(&[]);
        let arbiter = ResponseArbiter::default();

        let reply = arbiter.respond(&state, "I ate lunch also dinner", &mut FixedRandom(0));
        assert_eq!(reply.source, ReplySource::Generated);
        assert_eq!(reply.text, "Nice! What did you have to eat?");
    }
}
