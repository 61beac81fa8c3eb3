//! Storage clients for the files-manager backend
//!
//! - [`mongodb::DocumentStoreClient`]: document counts and collection handles
//!   for `users` and `files`, liveness from driver heartbeats
//! - [`redis::CacheClient`]: get / set with TTL / delete, liveness from
//!   connection events
//!
//! Both are built once by the application and shared behind an `Arc`.
//!
//! # Features
//!
//! - `mongodb` (default) - document store client
//! - `redis` (default) - cache client
//!
//! # Examples
//!
//! ```ignore
//! use core_config::FromEnv;
//! use storage::mongodb::{DocumentStoreClient, DocumentStoreConfig};
//! use storage::redis::CacheClient;
//!
//! let db = DocumentStoreClient::connect(&DocumentStoreConfig::from_env()?).await?;
//! let cache = CacheClient::new()?;
//!
//! cache.set("auth_abc", "user-42", 86_400).await?;
//! let files = db.count_files().await?;
//! ```

pub mod common;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{
    ConnectionEvent, ConnectionEvents, ConnectionObserver, HealthStatus, Liveness,
    LivenessTracker, StorageError, StorageResult,
};
