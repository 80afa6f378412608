//! Curation settings loaded from a JSON file with environment overrides.
//!
//! Every field has a default, so a missing file (or an empty object) yields a
//! working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::detection::{ScreeningRules, DEFAULT_MIN_TOKEN_LENGTH, SPANISH_STOP_WORDS};
use crate::glossary::{SeedTerms, DEFAULT_ARGENTINE_SEEDS, DEFAULT_ECONOMIC_SEEDS};
use crate::storage::DEFAULT_STORAGE_TIMEOUT;
use crate::text::DEFAULT_CONTEXT_WIDTH;
use crate::turso::{RetryPolicy, DATABASE_FILE};

/// Directory name under the platform config/data dirs
pub const APP_DIR: &str = "glosario";

/// Settings file name
pub const SETTINGS_FILE: &str = "glosario.json";

/// Environment variable overriding `databasePath`
pub const ENV_DB_PATH: &str = "GLOSARIO_DB_PATH";

/// Environment variable overriding `minTokenLength`
pub const ENV_MIN_TOKEN_LENGTH: &str = "GLOSARIO_MIN_TOKEN_LENGTH";

/// The only language with normalization rules
pub const SUPPORTED_LANGUAGE: &str = "es";

/// Error types for settings loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("Failed to read settings from {path:?}: {message}")]
    Io { path: PathBuf, message: String },
    /// Settings file is not valid JSON for the settings shape
    #[error("Failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    /// A value is out of range or unsupported
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurationSettings {
    /// Database file; defaults to the platform data dir
    pub database_path: Option<PathBuf>,
    pub language: String,
    pub min_token_length: usize,
    pub context_width: usize,
    /// Added to the built-in stop words
    pub extra_stop_words: Vec<String>,
    /// Removed from the built-in stop words
    pub ignored_stop_words: Vec<String>,
    pub economic_seed_terms: Vec<String>,
    pub argentine_seed_terms: Vec<String>,
    pub storage_timeout_ms: u64,
    pub max_conflict_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for CurationSettings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            database_path: None,
            language: SUPPORTED_LANGUAGE.to_string(),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            context_width: DEFAULT_CONTEXT_WIDTH,
            extra_stop_words: Vec::new(),
            ignored_stop_words: Vec::new(),
            economic_seed_terms: DEFAULT_ECONOMIC_SEEDS.iter().map(|s| s.to_string()).collect(),
            argentine_seed_terms: DEFAULT_ARGENTINE_SEEDS.iter().map(|s| s.to_string()).collect(),
            storage_timeout_ms: DEFAULT_STORAGE_TIMEOUT.as_millis() as u64,
            max_conflict_retries: retry.max_attempts,
            retry_backoff_ms: retry.backoff.as_millis() as u64,
        }
    }
}

impl CurationSettings {
    /// Platform settings location, e.g. ~/.config/glosario/glosario.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings, apply environment overrides and validate.
    ///
    /// An explicit path must exist. Without one, the platform location is
    /// used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    crate::debug!("No settings file found, using defaults");
                    Self::default()
                }
            },
        };
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings = serde_json::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        crate::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) -> Result<(), SettingsError> {
        if let Ok(db_path) = std::env::var(ENV_DB_PATH) {
            if !db_path.trim().is_empty() {
                crate::debug!("{} overrides databasePath", ENV_DB_PATH);
                self.database_path = Some(PathBuf::from(db_path));
            }
        }
        if let Ok(value) = std::env::var(ENV_MIN_TOKEN_LENGTH) {
            self.min_token_length = value.trim().parse().map_err(|_| {
                SettingsError::Invalid(format!("{} must be a number, got '{}'", ENV_MIN_TOKEN_LENGTH, value))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.language != SUPPORTED_LANGUAGE {
            return Err(SettingsError::Invalid(format!(
                "language '{}' is not supported (only '{}')",
                self.language, SUPPORTED_LANGUAGE
            )));
        }
        if self.max_conflict_retries == 0 {
            return Err(SettingsError::Invalid(
                "maxConflictRetries must be at least 1".to_string(),
            ));
        }
        if self.storage_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "storageTimeoutMs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured database path, or the platform data dir, or the working directory
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR).join(DATABASE_FILE))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
        })
    }

    pub fn screening_rules(&self) -> ScreeningRules {
        ScreeningRules::new(self.min_token_length, SPANISH_STOP_WORDS)
            .with_stop_words(&self.extra_stop_words)
            .without_stop_words(&self.ignored_stop_words)
    }

    pub fn seed_terms(&self) -> SeedTerms {
        SeedTerms {
            economic: self.economic_seed_terms.clone(),
            argentine: self.argentine_seed_terms.clone(),
        }
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_conflict_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
