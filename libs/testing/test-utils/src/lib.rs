//! Shared test utilities for the storage clients
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `TestDataBuilder`: deterministic keys (always available)
//! - `eventually`: poll a condition that settles asynchronously (always available)
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["all"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestRedis, eventually};
//!
//! #[tokio::test]
//! async fn my_cache_test() {
//!     let redis = TestRedis::new().await;
//!     let cache = CacheClient::with_config(CacheConfig::new(redis.connection_string())).unwrap();
//!     assert!(eventually(|| cache.is_alive()).await);
//! }
//! ```

use std::time::Duration;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// How long [`eventually`] waits before giving up
pub const EVENTUALLY_TIMEOUT: Duration = Duration::from_secs(15);

/// Poll `condition` until it holds or [`EVENTUALLY_TIMEOUT`] elapses
///
/// Returns whether the condition was observed. Use it for state that is
/// updated from background tasks, such as liveness flags.
pub async fn eventually(condition: impl FnMut() -> bool) -> bool {
    eventually_within(EVENTUALLY_TIMEOUT, condition).await
}

/// [`eventually`] with an explicit timeout
pub async fn eventually_within(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

/// Builder for test data with deterministic keys
///
/// Keys derived from the test name keep tests reproducible and stop
/// tests sharing a container from stepping on each other.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is the hash of the name)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_round_trip");
    /// let key = builder.key("auth");
    /// assert!(key.starts_with("auth_"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A cache key in the `{prefix}_{seed}` shape
    pub fn key(&self, prefix: &str) -> String {
        format!("{}_{:x}", prefix, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.key("auth"), builder2.key("auth"));
        assert_eq!(builder1.key("auth"), "auth_2a");
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.key("auth"), builder2.key("auth"));
    }

    #[tokio::test]
    async fn test_eventually_observes_condition() {
        let mut calls = 0;
        let observed = eventually(|| {
            calls += 1;
            calls >= 3
        })
        .await;
        assert!(observed);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_eventually_within_times_out() {
        let observed = eventually_within(Duration::from_millis(60), || false).await;
        assert!(!observed);
    }
}
