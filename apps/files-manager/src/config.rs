use core_config::{ConfigError, FromEnv};
use std::path::Path;

// Storage configs live with their clients
use storage::mongodb::DocumentStoreConfig;
use storage::redis::CacheConfig;

pub use core_config::Environment;

/// Application configuration
///
/// The document store reads `DB_*` variables; the cache always targets the
/// default local endpoint.
#[derive(Clone, Debug)]
pub struct Config {
    pub document_store: DocumentStoreConfig,
    pub cache: CacheConfig,
    pub environment: Environment,
}

impl Config {
    /// Read `.env` from the working directory, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(".env")
    }

    /// Apply an env file, then read the environment
    ///
    /// A missing file is ignored. Variables already set in the process
    /// environment win over the file.
    pub fn load_from(env_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(env_file).ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            document_store: DocumentStoreConfig::from_env()?,
            cache: CacheConfig::default(),
            environment: Environment::from_env(),
        })
    }
}
