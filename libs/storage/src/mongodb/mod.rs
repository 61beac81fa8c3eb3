//! Document store client backed by MongoDB
//!
//! Exposes counts and raw handles for the `users` and `files` collections,
//! plus a heartbeat-driven liveness flag.

mod client;
mod config;
mod health;

pub use client::{DocumentStoreClient, FILES_COLLECTION, USERS_COLLECTION};
pub use config::{DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, DocumentStoreConfig};

// Re-export MongoDB types for convenience
pub use mongodb::bson::{Document, doc};
pub use mongodb::{Collection, Database};
