use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

use crate::brain::ReusePolicy;
use crate::error::AppError;

const ENV_DATA_DIR: &str = "PERSONA_DATA_DIR";
const ENV_QUESTION_THRESHOLD: &str = "PERSONA_QUESTION_THRESHOLD";
const ENV_STATEMENT_THRESHOLD: &str = "PERSONA_STATEMENT_THRESHOLD";
const ENV_MAX_FEATURES: &str = "PERSONA_MAX_FEATURES";
const ENV_NEIGHBORS: &str = "PERSONA_NEIGHBORS";
const ENV_SEED: &str = "PERSONA_SEED";
const ENV_LOG_JSON: &str = "PERSONA_LOG_JSON";

/// Runtime configuration for the responder.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct AppConfig {
    /// Root directory for the corpus database and model artifacts.
    pub data_dir: PathBuf,
    /// Maximum neighbor distance for reusing a response to a question. Strict bound.
    #[validate(range(min = 0.0, max = 2.0))]
    pub question_threshold: f32,
    /// Maximum neighbor distance for reusing a response to anything else. Strict bound.
    #[validate(range(min = 0.0, max = 2.0))]
    pub statement_threshold: f32,
    /// Vocabulary cap for the TF-IDF vectorizer.
    #[validate(range(min = 1))]
    pub max_features: usize,
    /// Neighbors kept per similarity query.
    #[validate(range(min = 1))]
    pub neighbors: usize,
    /// Seed for template selection; entropy when unset.
    pub seed: Option<u64>,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = ReusePolicy::default();
        Self {
            data_dir: PathBuf::from("data"),
            question_threshold: policy.question_threshold,
            statement_threshold: policy.statement_threshold,
            max_features: crate::brain::vectorizer::DEFAULT_MAX_FEATURES,
            neighbors: crate::brain::neighbors::DEFAULT_NEIGHBORS,
            seed: None,
            log_json: false,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Load configuration from the environment (and `.env` if present), then validate.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            data_dir: parse_var::<PathBuf>(ENV_DATA_DIR)?.unwrap_or(defaults.data_dir),
            question_threshold: parse_var(ENV_QUESTION_THRESHOLD)?
                .unwrap_or(defaults.question_threshold),
            statement_threshold: parse_var(ENV_STATEMENT_THRESHOLD)?
                .unwrap_or(defaults.statement_threshold),
            max_features: parse_var(ENV_MAX_FEATURES)?.unwrap_or(defaults.max_features),
            neighbors: parse_var(ENV_NEIGHBORS)?.unwrap_or(defaults.neighbors),
            seed: parse_var(ENV_SEED)?,
            log_json: parse_flag(ENV_LOG_JSON),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn reuse_policy(&self) -> ReusePolicy {
        ReusePolicy {
            question_threshold: self.question_threshold,
            statement_threshold: self.statement_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 7] = [
        ENV_DATA_DIR,
        ENV_QUESTION_THRESHOLD,
        ENV_STATEMENT_THRESHOLD,
        ENV_MAX_FEATURES,
        ENV_NEIGHBORS,
        ENV_SEED,
        ENV_LOG_JSON,
    ];

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let config = AppConfig::from_env().expect("Defaults should load");
            assert_eq!(config.question_threshold, 0.6);
            assert_eq!(config.statement_threshold, 0.8);
            assert_eq!(config.max_features, 100);
            assert_eq!(config.neighbors, 3);
            assert_eq!(config.seed, None);
            assert!(!config.log_json);
        });
    }

    #[test]
    fn test_overrides_from_env() {
        temp_env::with_vars(
            [
                (ENV_DATA_DIR, Some("/tmp/persona")),
                (ENV_QUESTION_THRESHOLD, Some("0.5")),
                (ENV_SEED, Some("7")),
                (ENV_LOG_JSON, Some("true")),
            ],
            || {
                let config = AppConfig::from_env().expect("Overrides should load");
                assert_eq!(config.data_dir, PathBuf::from("/tmp/persona"));
                assert_eq!(config.reuse_policy().question_threshold, 0.5);
                assert_eq!(config.seed, Some(7));
                assert!(config.log_json);
            },
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        temp_env::with_var(ENV_MAX_FEATURES, Some("lots"), || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });

        temp_env::with_var(ENV_STATEMENT_THRESHOLD, Some("3.5"), || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });

        temp_env::with_var(ENV_NEIGHBORS, Some("0"), || {
            assert!(AppConfig::from_env().is_err());
        });
    }
}
