//! Persona Service - the owned context every request goes through.
//!
//! Holds the current `ModelState` behind a read-write lock around an `Arc`.
//! Requests clone the `Arc` and work on that snapshot without holding the
//! lock; training and learning build a complete new snapshot first and then
//! swap it in, so readers see either the old model or the new one.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{error, info, instrument, warn};

use crate::brain::{ModelState, RandomSource, ResponseArbiter, SeededRandom, SimilarityIndex};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{
    ConversationPair, Reply, ReplySource, ServiceStats, SessionExchange, TrainSummary,
};
use crate::session::{SessionLog, SESSION_CAPACITY};
use crate::traits::{CorpusSource, ModelStore};

/// Returned instead of a reply while no trained model is available.
pub const NOT_READY_MESSAGE: &str = "Please train the model first.";

/// Boundary check for inbound messages; empty or blank text never reaches the core.
pub fn validate_message(text: &str) -> Result<&str, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Message content is empty".to_string()));
    }
    Ok(trimmed)
}

pub struct PersonaService {
    state: RwLock<Option<Arc<ModelState>>>,
    index_template: SimilarityIndex,
    arbiter: ResponseArbiter,
    corpus: Arc<dyn CorpusSource>,
    store: Arc<dyn ModelStore>,
    rng: Mutex<Box<dyn RandomSource>>,
    train_lock: tokio::sync::Mutex<()>,
    session: Mutex<SessionLog>,
}

impl PersonaService {
    pub fn new(
        config: &AppConfig,
        corpus: Arc<dyn CorpusSource>,
        store: Arc<dyn ModelStore>,
    ) -> Self {
        Self {
            state: RwLock::new(None),
            index_template: SimilarityIndex::new(config.max_features, config.neighbors),
            arbiter: ResponseArbiter::new(config.reuse_policy()),
            corpus,
            store,
            rng: Mutex::new(Box::new(SeededRandom::from_optional_seed(config.seed))),
            train_lock: tokio::sync::Mutex::new(()),
            session: Mutex::new(SessionLog::with_capacity(SESSION_CAPACITY)),
        }
    }

    /// Replace the randomness used for template and connector choice.
    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Current model snapshot, if any.
    pub fn current(&self) -> Option<Arc<ModelState>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn models_loaded(&self) -> bool {
        self.current().is_some()
    }

    fn install(&self, state: ModelState) -> Arc<ModelState> {
        let state = Arc::new(state);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        state
    }

    /// Install a loaded snapshot unless training already put one in place.
    fn install_if_empty(&self, state: ModelState) -> bool {
        let mut slot = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(Arc::new(state));
        true
    }

    /// Like `load_models`, but unreadable artifacts are logged and count as
    /// nothing loaded.
    pub async fn try_load_models(&self) -> bool {
        match self.load_models().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Could not load model artifacts: {}", e);
                false
            }
        }
    }

    /// Load persisted artifacts. `Ok(false)` means nothing usable was found.
    #[instrument(skip(self))]
    pub async fn load_models(&self) -> Result<bool, AppError> {
        match self.store.load_artifacts().await {
            Ok(Some(state)) => {
                if !self.install_if_empty(state) {
                    info!("A newer model was installed while loading; keeping it");
                }
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(AppError::ArtifactVersion { found, expected }) => {
                warn!(
                    "Ignoring model artifacts with format version {} (expected {})",
                    found, expected
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Reply text for `text`. Never fails.
    pub async fn generate(&self, text: &str) -> String {
        self.reply(text).await.text
    }

    /// The current model, loading persisted artifacts on first use.
    pub async fn ready_state(&self) -> Result<Arc<ModelState>, AppError> {
        if let Some(state) = self.current() {
            return Ok(state);
        }
        if self.load_models().await? {
            if let Some(state) = self.current() {
                return Ok(state);
            }
        }
        Err(AppError::NotTrained)
    }

    /// Reply with provenance. Answers with `NOT_READY_MESSAGE` while no
    /// model can be loaded.
    #[instrument(skip(self))]
    pub async fn reply(&self, text: &str) -> Reply {
        let reply = match self.ready_state().await {
            Ok(state) => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                self.arbiter.respond(&state, text, &mut **rng)
            }
            Err(AppError::NotTrained) => Reply::new(NOT_READY_MESSAGE, ReplySource::NotReady),
            Err(e) => {
                error!("Failed to load models: {}", e);
                Reply::new(NOT_READY_MESSAGE, ReplySource::NotReady)
            }
        };

        info!("{} -> {} ({})", text, reply.text, reply.source.label());
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(text, &reply);
        reply
    }

    /// Replace profile and similarity model with ones built from `pairs`.
    #[instrument(skip(self, pairs), fields(pairs = pairs.len()))]
    pub async fn train(&self, pairs: Vec<ConversationPair>) -> TrainSummary {
        let _guard = self.train_lock.lock().await;
        self.train_locked(pairs).await
    }

    /// Train from everything in the corpus source.
    pub async fn train_from_corpus(&self) -> Result<TrainSummary, AppError> {
        let _guard = self.train_lock.lock().await;
        let pairs = self.corpus.load_corpus().await?;
        Ok(self.train_locked(pairs).await)
    }

    async fn train_locked(&self, pairs: Vec<ConversationPair>) -> TrainSummary {
        info!("Training on {} conversations", pairs.len());
        let state = self.install(ModelState::train(pairs, &self.index_template));
        self.persist(&state).await
    }

    /// Store a new pair and refit the similarity model over the full corpus.
    ///
    /// The style profile is left as it was at the last full training.
    #[instrument(skip(self))]
    pub async fn learn(&self, input: &str, response: &str) -> Result<TrainSummary, AppError> {
        let input = validate_message(input)?;
        let response = validate_message(response)?;

        let _guard = self.train_lock.lock().await;
        self.corpus.append_pair(input, response).await?;

        match self.ready_state().await {
            Ok(state) => {
                let next = state.learn(ConversationPair::new(input, response));
                let next = self.install(next);
                Ok(self.persist(&next).await)
            }
            Err(AppError::NotTrained) => {
                info!("No trained model yet; training from the full corpus");
                let pairs = self.corpus.load_corpus().await?;
                Ok(self.train_locked(pairs).await)
            }
            Err(e) => Err(e),
        }
    }

    async fn persist(&self, state: &ModelState) -> TrainSummary {
        let persisted = match self.store.save_artifacts(state).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not persist model artifacts, keeping in-memory model: {}", e);
                false
            }
        };

        TrainSummary {
            pairs: state.corpus().len(),
            vocabulary: state.index().vocabulary_len(),
            persisted,
        }
    }

    pub fn stats(&self) -> ServiceStats {
        let state = self.current();
        ServiceStats {
            models_loaded: state.is_some(),
            corpus_size: state.as_ref().map(|s| s.corpus().len()).unwrap_or(0),
            vocabulary_size: state
                .as_ref()
                .map(|s| s.index().vocabulary_len())
                .unwrap_or(0),
            session_messages: self
                .session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
        }
    }

    pub fn recent_exchanges(&self) -> Vec<SessionExchange> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recent()
    }

    pub fn clear_session(&self) {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
