//! # Brain Module
//!
//! Response selection for the persona: no language model, only retrieval over
//! the person's past replies plus rule-based templates.
//!
//! ## Components
//! - `intent`: rule-based input classification
//! - `vectorizer`: TF-IDF over unigrams and bigrams
//! - `neighbors`: cosine k-nearest-neighbor search
//! - `similarity`: vectorizer and neighbor index fitted as one unit
//! - `style`: style profiling and application
//! - `templates`: canned responses per intent
//! - `random`: seedable randomness for template choice
//! - `state`: the trained model snapshot
//! - `arbiter`: main orchestrator

pub mod arbiter;
pub mod intent;
pub mod neighbors;
pub mod random;
pub mod similarity;
pub mod state;
pub mod style;
pub mod templates;
pub mod vectorizer;

pub use arbiter::{ResponseArbiter, ReusePolicy};
pub use intent::{InputClassifier, IntentCategory};
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use similarity::SimilarityIndex;
pub use state::ModelState;
pub use style::{Formality, PunctuationStyle, StyleApplier, StyleProfile, StyleProfiler};
pub use templates::TemplateResponder;
