//! Versioned on-disk format for trained models.
//!
//! Corpus, vectorizer, neighbor rows and style profile are written as one
//! JSON document. Writes go to a temporary file in the target directory and
//! are renamed into place, so a crash never leaves a vectorizer paired with
//! a neighbor index from another training run.

use crate::brain::ModelState;
use crate::error::AppError;
use crate::traits::ModelStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bump on any change that older readers cannot decode.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactFile {
    format_version: u32,
    saved_at: DateTime<Utc>,
    model: ModelState,
}

/// Only the header, so a version mismatch is reported before decoding the body.
#[derive(Debug, Deserialize)]
struct ArtifactHeader {
    format_version: u32,
}

/// `ModelStore` writing a single artifact file.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<Option<ModelState>, AppError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let header: ArtifactHeader = serde_json::from_str(&raw)?;
        if header.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(AppError::ArtifactVersion {
                found: header.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        let file: ArtifactFile = serde_json::from_str(&raw)?;
        if !file.model.is_consistent() {
            return Err(AppError::Internal(format!(
                "Artifact at {:?} has {} index rows for {} corpus pairs",
                path,
                file.model.index().len(),
                file.model.corpus().len()
            )));
        }
        Ok(Some(file.model))
    }

    fn write(path: &Path, state: &ModelState) -> Result<(), AppError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let file = ArtifactFile {
            format_version: ARTIFACT_FORMAT_VERSION,
            saved_at: Utc::now(),
            model: state.clone(),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, &file)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }
}

#[async_trait]
impl ModelStore for FileModelStore {
    async fn load_artifacts(&self) -> Result<Option<ModelState>, AppError> {
        let path = self.path.clone();
        let loaded = tokio::task::spawn_blocking(move || Self::read(&path))
            .await
            .map_err(|e| AppError::Internal(format!("Artifact load task failed: {}", e)))??;

        match &loaded {
            Some(state) => info!(
                "Loaded model artifacts from {:?} ({} pairs)",
                self.path,
                state.corpus().len()
            ),
            None => warn!("No model artifacts at {:?}", self.path),
        }
        Ok(loaded)
    }

    async fn save_artifacts(&self, state: &ModelState) -> Result<(), AppError> {
        let path = self.path.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || Self::write(&path, &state))
            .await
            .map_err(|e| AppError::Internal(format!("Artifact save task failed: {}", e)))??;

        info!("Saved model artifacts to {:?}", self.path);
        Ok(())
    }
}
