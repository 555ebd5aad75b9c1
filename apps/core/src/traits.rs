use crate::brain::ModelState;
use crate::error::AppError;
use crate::models::ConversationPair;
use async_trait::async_trait;

/// Durable source of the training corpus.
///
/// Implementations must return pairs in insertion order.
#[async_trait]
pub trait CorpusSource: Send + Sync + 'static {
    /// Loads every stored pair, oldest first.
    async fn load_corpus(&self) -> Result<Vec<ConversationPair>, AppError>;

    /// Appends a pair and persists it before returning.
    async fn append_pair(&self, input: &str, response: &str) -> Result<(), AppError>;

    /// Number of stored pairs.
    async fn count(&self) -> Result<usize, AppError>;
}

/// Durable store for trained model artifacts.
///
/// Missing artifacts are a normal "not yet trained" state and map to `Ok(None)`.
#[async_trait]
pub trait ModelStore: Send + Sync + 'static {
    async fn load_artifacts(&self) -> Result<Option<ModelState>, AppError>;

    /// Writes corpus, vectorizer, neighbor index and profile as one unit.
    async fn save_artifacts(&self, state: &ModelState) -> Result<(), AppError>;
}
