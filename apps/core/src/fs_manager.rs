use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const DB_FILENAME: &str = "persona.sqlite";
const ARTIFACT_FILENAME: &str = "persona_model.json";

/// Directory layout under the configured data root.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root data directory.
    pub fn data_dir(&self) -> &Path {
        &self.root
    }

    /// Corpus database directory (./data/db).
    pub fn db_dir(&self) -> PathBuf {
        self.root.join("db")
    }

    /// Model artifact directory (./data/models).
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir().join(DB_FILENAME)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.models_dir().join(ARTIFACT_FILENAME)
    }

    /// Create the data, db and models directories if they are missing.
    pub fn init(&self) -> Result<(), std::io::Error> {
        for dir in [self.root.clone(), self.db_dir(), self.models_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
