//! Application state: the storage clients built once at startup.

use std::sync::Arc;
use storage::StorageResult;
use storage::mongodb::DocumentStoreClient;
use storage::redis::CacheClient;
use tracing::{info, warn};

use crate::config::Config;

/// Liveness of both backing stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStatus {
    pub redis: bool,
    pub db: bool,
}

/// Document counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    pub users: u64,
    pub files: u64,
}

/// Shared application state, cheap to clone.
///
/// Consumers (request handlers, workers) receive the clients from here
/// instead of reaching for globals.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Arc<DocumentStoreClient>,
    pub cache: Arc<CacheClient>,
}

impl AppState {
    /// Build both clients. Neither waits for its server.
    pub async fn build(config: &Config) -> StorageResult<Self> {
        let db = DocumentStoreClient::connect(&config.document_store).await?;
        let cache = CacheClient::with_config(config.cache.clone())?;

        Ok(Self {
            db: Arc::new(db),
            cache: Arc::new(cache),
        })
    }

    pub fn status(&self) -> StorageStatus {
        StorageStatus {
            redis: self.cache.is_alive(),
            db: self.db.is_alive(),
        }
    }

    pub async fn stats(&self) -> StorageResult<StorageStats> {
        let (users, files) = tokio::try_join!(self.db.count_users(), self.db.count_files())?;
        Ok(StorageStats { users, files })
    }

    /// Log liveness and, when the document store answers, the counts
    pub async fn report(&self) {
        let status = self.status();
        info!(redis = status.redis, db = status.db, "Storage status");

        match self.stats().await {
            Ok(stats) => info!(users = stats.users, files = stats.files, "Storage stats"),
            Err(e) => warn!(error = %e, "Document counts unavailable"),
        }
    }

    /// Stop background work and close the document store client
    pub async fn shutdown(self) {
        self.cache.shutdown();

        match Arc::try_unwrap(self.db) {
            Ok(db) => db.shutdown().await,
            Err(_) => warn!("Document store still shared at shutdown, leaving it to drop"),
        }
        info!("Storage clients shut down");
    }
}
