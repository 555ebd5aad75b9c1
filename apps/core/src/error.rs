use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents errors originating from the corpus database, typically from `sqlx`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents failures while encoding or decoding JSON documents.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Represents data validation errors (e.g., an empty chat message).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., unparseable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// No trained model artifacts are available yet.
    #[error("Models have not been trained yet")]
    NotTrained,

    /// Writing model artifacts to durable storage failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The artifact file on disk was written by an incompatible format version.
    #[error("Artifact format version {found} is not supported (expected {expected})")]
    ArtifactVersion { found: u32, expected: u32 },

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}

impl From<tempfile::PersistError> for AppError {
    fn from(err: tempfile::PersistError) -> Self {
        AppError::Persistence(format!("Atomic rename failed: {}", err.error))
    }
}
