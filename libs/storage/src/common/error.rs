/// Unified error type for the storage clients
///
/// Driver errors are wrapped unchanged so callers can still inspect them.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No connection to the backing store could be established
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// MongoDB driver errors
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Redis transport errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

impl StorageError {
    /// Whether this error means the backing store could not be reached.
    ///
    /// Covers explicit [`StorageError::Unavailable`], MongoDB server selection
    /// and I/O failures, and Redis refused/dropped/timed-out connections.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StorageError::Unavailable(_) => true,
            #[cfg(feature = "mongodb")]
            StorageError::Mongo(e) => {
                use mongodb::error::ErrorKind;
                matches!(
                    *e.kind,
                    ErrorKind::ServerSelection { .. } | ErrorKind::Io(_)
                )
            }
            #[cfg(feature = "redis")]
            StorageError::Redis(e) => is_transport_failure(e),
            _ => false,
        }
    }
}

/// Redis errors that indicate the connection itself is broken
#[cfg(feature = "redis")]
pub(crate) fn is_transport_failure(err: &redis::RedisError) -> bool {
    err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
