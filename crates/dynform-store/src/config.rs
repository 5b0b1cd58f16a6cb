//! Submission store configuration.
//!
//! Picks the backend and the key the submission log lives under. Defaults
//! to an in-memory store under `submittedFormData`. Override via
//! environment variables, a YAML document, or explicit construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::{SubmissionLog, DEFAULT_LOG_KEY};
use crate::store::{is_valid_key, FileStore, MemoryStore, RecordStore};
use dynform_core::PersistenceError;

/// Environment variable overriding the log key.
pub const ENV_STORE_KEY: &str = "DYNFORM_STORE_KEY";
/// Environment variable selecting the file backend and its directory.
pub const ENV_STORE_DIR: &str = "DYNFORM_STORE_DIR";

/// Where submissions are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    File { dir: PathBuf },
}

/// Configuration for the submission store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage key of the submission log.
    pub key: String,
    pub backend: StoreBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_LOG_KEY.to_string(),
            backend: StoreBackend::Memory,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DYNFORM_STORE_KEY` (default: `submittedFormData`)
    /// - `DYNFORM_STORE_DIR` (optional; selects the file backend)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let key = match lookup(ENV_STORE_KEY) {
            Some(key) => validate_key(key)?,
            None => DEFAULT_LOG_KEY.to_string(),
        };
        let backend = match lookup(ENV_STORE_DIR) {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::EmptyDir(ENV_STORE_DIR.to_string()))
            }
            Some(dir) => StoreBackend::File { dir: dir.into() },
            None => StoreBackend::Memory,
        };
        Ok(Self { key, backend })
    }

    /// Parse configuration from YAML. Missing keys take their defaults.
    ///
    /// ```yaml
    /// key: signupSubmissions
    /// backend:
    ///   kind: file
    ///   dir: /var/lib/dynform
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| ConfigError::InvalidYaml(e.to_string()))?;
        validate_key(config.key.clone())?;
        Ok(config)
    }

    /// Construct the configured store.
    pub fn open(&self) -> Box<dyn RecordStore> {
        match &self.backend {
            StoreBackend::Memory => Box::new(MemoryStore::new()),
            StoreBackend::File { dir } => Box::new(FileStore::new(dir.clone())),
        }
    }

    /// Construct the store and load the submission log from it.
    pub fn open_log(&self) -> Result<SubmissionLog<Box<dyn RecordStore>>, PersistenceError> {
        SubmissionLog::open(self.open(), self.key.clone())
    }
}

fn validate_key(key: String) -> Result<String, ConfigError> {
    if is_valid_key(&key) {
        Ok(key)
    } else {
        Err(ConfigError::InvalidKey(key))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid store key {0:?}: use ASCII letters, digits, '-' and '_'")]
    InvalidKey(String),
    #[error("{0} is set but empty")]
    EmptyDir(String),
    #[error("invalid store configuration: {0}")]
    InvalidYaml(String),
}
