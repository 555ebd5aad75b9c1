use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A past exchange: something said to the person and what they answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationPair {
    /// The message the person was replying to.
    pub input: String,
    /// The person's own reply.
    pub response: String,
}

impl ConversationPair {
    pub fn new(input: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            response: response.into(),
        }
    }
}

/// A stored corpus row with its bookkeeping columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CorpusEntry {
    /// Autoincrement id; ascending order is insertion order.
    pub id: i64,
    pub input: String,
    pub response: String,
    /// Word count of the response.
    pub response_length: i64,
    /// Whether the input contained a question mark.
    pub is_question: bool,
    /// Unix timestamp of insertion.
    pub created_at: i64,
}

/// One record of the JSON corpus export format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedConversation {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub input: String,
    pub response: String,
    #[serde(default)]
    pub response_length: Option<usize>,
    #[serde(default)]
    pub is_question: Option<bool>,
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Verbatim corpus response for a near-identical past input.
    Personal,
    /// Verbatim corpus response of the nearest neighbor.
    SimilarPersonal,
    /// Styled template for the classified intent.
    Generated,
    /// Per-clause responses joined with a connector.
    Combined,
    /// Models are not trained yet.
    NotReady,
}

impl ReplySource {
    pub fn label(&self) -> &'static str {
        match self {
            ReplySource::Personal => "personal",
            ReplySource::SimilarPersonal => "similar_personal",
            ReplySource::Generated => "generated",
            ReplySource::Combined => "combined",
            ReplySource::NotReady => "not_ready",
        }
    }
}

/// A response together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// An exchange recorded in the current session (not part of the training corpus).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExchange {
    pub id: uuid::Uuid,
    pub timestamp: DateTime<Utc>,
    pub input: String,
    pub response: String,
    pub source: ReplySource,
}

/// Snapshot of service health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub models_loaded: bool,
    pub corpus_size: usize,
    pub vocabulary_size: usize,
    pub session_messages: usize,
}

/// Outcome of a train or learn event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSummary {
    /// Corpus size the new model was fitted on.
    pub pairs: usize,
    /// Terms kept by the vectorizer.
    pub vocabulary: usize,
    /// False when writing artifacts failed; the in-memory model is still live.
    pub persisted: bool,
}
