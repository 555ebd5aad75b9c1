use crate::error::AppError;
use crate::models::{CollectedConversation, ConversationPair, CorpusEntry};
use crate::traits::CorpusSource;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

pub async fn init_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing corpus database at: {:?}", db_path);

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    info!("Corpus database initialized and migrations applied.");

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            input TEXT NOT NULL,
            response TEXT NOT NULL,
            response_length INTEGER NOT NULL,
            is_question BOOLEAN NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

// --- Conversations CRUD ---

pub async fn add_conversation(
    pool: &SqlitePool,
    input: &str,
    response: &str,
) -> Result<CorpusEntry, sqlx::Error> {
    let created_at = Utc::now().timestamp();
    let response_length = response.split_whitespace().count() as i64;
    let is_question = input.contains('?');

    sqlx::query_as::<_, CorpusEntry>(
        r#"
        INSERT INTO conversations (input, response, response_length, is_question, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, input, response, response_length, is_question, created_at
        "#,
    )
    .bind(input)
    .bind(response)
    .bind(response_length)
    .bind(is_question)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn get_conversations(pool: &SqlitePool) -> Result<Vec<CorpusEntry>, sqlx::Error> {
    sqlx::query_as::<_, CorpusEntry>(
        r#"
        SELECT id, input, response, response_length, is_question, created_at
        FROM conversations
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_training_pairs(pool: &SqlitePool) -> Result<Vec<ConversationPair>, sqlx::Error> {
    sqlx::query_as::<_, ConversationPair>(
        r#"
        SELECT input, response
        FROM conversations
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_conversations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Import a JSON array of collected conversations. Returns the number of pairs added.
pub async fn import_json_corpus(pool: &SqlitePool, path: &Path) -> Result<usize, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let records: Vec<CollectedConversation> = serde_json::from_str(&raw)?;

    let mut tx = pool.begin().await?;
    let mut imported = 0;
    for record in &records {
        if record.input.trim().is_empty() || record.response.trim().is_empty() {
            continue;
        }
        sqlx::query(
            r#"
            INSERT INTO conversations (input, response, response_length, is_question, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.input)
        .bind(&record.response)
        .bind(record.response.split_whitespace().count() as i64)
        .bind(record.input.contains('?'))
        .bind(Utc::now().timestamp())
        .execute(&mut *tx)
        .await?;
        imported += 1;
    }
    tx.commit().await?;

    info!("Imported {} of {} records from {:?}", imported, records.len(), path);
    Ok(imported)
}

/// `CorpusSource` backed by the SQLite `conversations` table.
#[derive(Clone)]
pub struct SqliteCorpus {
    pool: SqlitePool,
}

impl SqliteCorpus {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CorpusSource for SqliteCorpus {
    async fn load_corpus(&self) -> Result<Vec<ConversationPair>, AppError> {
        Ok(get_training_pairs(&self.pool).await?)
    }

    async fn append_pair(&self, input: &str, response: &str) -> Result<(), AppError> {
        let entry = add_conversation(&self.pool, input, response).await?;
        info!("Added conversation {}", entry.id);
        Ok(())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(count_conversations(&self.pool).await? as usize)
    }
}
