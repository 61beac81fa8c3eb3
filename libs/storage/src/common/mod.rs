//! Common utilities shared by both storage clients

pub mod error;
pub mod events;
pub mod health;

pub use error::{StorageError, StorageResult};
pub use events::{ConnectionEvent, ConnectionEvents, ConnectionObserver, Liveness, LivenessTracker};
pub use health::HealthStatus;
