use crate::models::{Reply, SessionExchange};
use chrono::Utc;
use std::collections::VecDeque;

/// Number of exchanges returned by `recent`.
pub const RECENT_EXCHANGES: usize = 20;

/// Exchanges kept by the service before the oldest are dropped.
pub const SESSION_CAPACITY: usize = RECENT_EXCHANGES * 10;

/// In-memory log of the current chat session. Never feeds the training corpus.
#[derive(Debug, Default)]
pub struct SessionLog {
    exchanges: VecDeque<SessionExchange>,
    capacity: Option<usize>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that drops the oldest exchange once `capacity` is reached.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            exchanges: VecDeque::with_capacity(capacity),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn record(&mut self, input: &str, reply: &Reply) -> SessionExchange {
        let exchange = SessionExchange {
            id: uuid::Uuid::new_v4(),
            timestamp: Utc::now(),
            input: input.to_string(),
            response: reply.text.clone(),
            source: reply.source,
        };

        if let Some(capacity) = self.capacity {
            while self.exchanges.len() >= capacity {
                self.exchanges.pop_front();
            }
        }
        self.exchanges.push_back(exchange.clone());
        exchange
    }

    /// The last `RECENT_EXCHANGES` exchanges, oldest first.
    pub fn recent(&self) -> Vec<SessionExchange> {
        let skip = self.exchanges.len().saturating_sub(RECENT_EXCHANGES);
        self.exchanges.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }
}
