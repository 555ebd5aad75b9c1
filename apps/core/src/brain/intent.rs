//! Input classification using lexical rules.
//!
//! Every input maps to exactly one `IntentCategory`. Rules are evaluated in a
//! fixed priority order and the first match wins; `CasualStatement` is the
//! fallback. All checks are case-insensitive substring tests on a trimmed copy
//! of the input, so the classifier is total and deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic intent of an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// Short salutation (hi, hello, hey, ...)
    Greeting,
    /// Someone reporting how they are doing
    StatusUpdate,
    /// Low-content replies (nothing, idk, same, ...)
    MinimalResponse,
    FoodRelated,
    LifeQuestion,
    /// "Are you listening?" style checks
    AttentionCheck,
    /// Question aimed at the responder
    QuestionPersonal,
    /// Any other question
    QuestionFactual,
    Agreement,
    Thanks,
    /// Fallback
    CasualStatement,
}

impl IntentCategory {
    /// Every category, in rule priority order.
    pub const ALL: [IntentCategory; 11] = [
        IntentCategory::Greeting,
        IntentCategory::StatusUpdate,
        IntentCategory::MinimalResponse,
        IntentCategory::FoodRelated,
        IntentCategory::LifeQuestion,
        IntentCategory::AttentionCheck,
        IntentCategory::QuestionPersonal,
        IntentCategory::QuestionFactual,
        IntentCategory::Agreement,
        IntentCategory::Thanks,
        IntentCategory::CasualStatement,
    ];

    /// Returns the snake_case label for the category
    pub fn label(&self) -> &'static str {
        match self {
            IntentCategory::Greeting => "greeting",
            IntentCategory::StatusUpdate => "status_update",
            IntentCategory::MinimalResponse => "minimal_response",
            IntentCategory::FoodRelated => "food_related",
            IntentCategory::LifeQuestion => "life_question",
            IntentCategory::AttentionCheck => "attention_check",
            IntentCategory::QuestionPersonal => "question_personal",
            IntentCategory::QuestionFactual => "question_factual",
            IntentCategory::Agreement => "agreement",
            IntentCategory::Thanks => "thanks",
            IntentCategory::CasualStatement => "casual_statement",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for IntentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentCategory::ALL
            .iter()
            .copied()
            .find(|category| category.label() == s.trim())
            .ok_or_else(|| format!("unknown intent category: {}", s))
    }
}

/// Exact-match greeting vocabulary, including punctuated and stretched forms.
const GREETING_WORDS: &[&str] = &[
    "hi", "hello", "hey", "hy", "helo", "yo", "sup", "hi!", "hello!", "hey!", "hi.", "hello.",
    "hey.", "hii", "helloo", "heyy",
];

/// Substrings that mark a very short input as a greeting.
const SHORT_GREETING_MARKERS: &[&str] = &["hi", "hey", "hello"];
const SHORT_GREETING_MAX_CHARS: usize = 5;

const STATUS_WORDS: &[&str] = &[
    "good", "fine", "ok", "okay", "great", "awesome", "excellent", "well",
];
const MINIMAL_WORDS: &[&str] = &[
    "nothing",
    "not much",
    "nm",
    "same",
    "idk",
    "don't know",
    "nothing much",
];
const FOOD_WORDS: &[&str] = &["eat", "ate", "eating", "food", "hungry", "meal"];
const LIFE_WORDS: &[&str] = &["life", "living", "existence", "world"];
const ATTENTION_WORDS: &[&str] = &["listen", "listening", "hear", "paying attention"];
const PERSONAL_WORDS: &[&str] = &["you", "your", "yourself"];
const AGREEMENT_WORDS: &[&str] = &[
    "yes", "yeah", "yep", "sure", "right", "true", "correct", "ok",
];
const THANKS_WORDS: &[&str] = &["thanks", "thank you", "thx", "ty"];

/// A keyword rule: the category wins if any keyword occurs in the input.
struct KeywordRule {
    category: IntentCategory,
    keywords: &'static [&'static str],
}

/// Keyword rules that run after the greeting check and before the question check.
const PRE_QUESTION_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: IntentCategory::StatusUpdate,
        keywords: STATUS_WORDS,
    },
    KeywordRule {
        category: IntentCategory::MinimalResponse,
        keywords: MINIMAL_WORDS,
    },
    KeywordRule {
        category: IntentCategory::FoodRelated,
        keywords: FOOD_WORDS,
    },
    KeywordRule {
        category: IntentCategory::LifeQuestion,
        keywords: LIFE_WORDS,
    },
    KeywordRule {
        category: IntentCategory::AttentionCheck,
        keywords: ATTENTION_WORDS,
    },
];

/// Keyword rules that run after the question check.
const POST_QUESTION_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: IntentCategory::Agreement,
        keywords: AGREEMENT_WORDS,
    },
    KeywordRule {
        category: IntentCategory::Thanks,
        keywords: THANKS_WORDS,
    },
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Rule-based input classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputClassifier;

impl InputClassifier {
    pub fn new() -> Self {
        Self
    }

    /// True when the input is a simple greeting that must never be answered
    /// from the corpus.
    pub fn is_greeting(&self, text: &str) -> bool {
        Self::is_greeting_normalized(&normalize(text))
    }

    fn is_greeting_normalized(text: &str) -> bool {
        if GREETING_WORDS.contains(&text) {
            return true;
        }
        text.chars().count() <= SHORT_GREETING_MAX_CHARS
            && contains_any(text, SHORT_GREETING_MARKERS)
    }

    /// Classify an input into exactly one category.
    pub fn classify(&self, text: &str) -> IntentCategory {
        let text = normalize(text);

        if Self::is_greeting_normalized(&text) {
            return IntentCategory::Greeting;
        }

        if let Some(rule) = PRE_QUESTION_RULES
            .iter()
            .find(|rule| contains_any(&text, rule.keywords))
        {
            return rule.category;
        }

        if text.contains('?') {
            return if contains_any(&text, PERSONAL_WORDS) {
                IntentCategory::QuestionPersonal
            } else {
                IntentCategory::QuestionFactual
            };
        }

        POST_QUESTION_RULES
            .iter()
            .find(|rule| contains_any(&text, rule.keywords))
            .map(|rule| rule.category)
            .unwrap_or(IntentCategory::CasualStatement)
    }
}
