use std::time::Instant;
use tracing::debug;

use super::CacheClient;
use crate::common::{HealthStatus, StorageError, StorageResult};

impl CacheClient {
    /// Actively probe Redis with `PING`
    ///
    /// Unlike [`CacheClient::is_alive`], this performs I/O. Does not touch the
    /// liveness flag.
    ///
    /// # Example
    /// ```ignore
    /// match cache.check_health().await {
    ///     Ok(()) => tracing::info!("cache healthy"),
    ///     Err(e) => tracing::warn!(error = %e, "cache unhealthy"),
    /// }
    /// ```
    pub async fn check_health(&self) -> StorageResult<()> {
        debug!("Running Redis health check");

        let mut conn = self.connection().await?;
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                StorageError::HealthCheckFailed(format!("Redis health check failed: {}", e))
            })?;

        if response != "PONG" {
            return Err(StorageError::HealthCheckFailed(format!(
                "Redis PING returned unexpected response: {}",
                response
            )));
        }

        debug!("Redis health check passed");
        Ok(())
    }

    /// Probe Redis and report timing alongside the outcome
    pub async fn check_health_detailed(&self) -> HealthStatus {
        let start = Instant::now();
        let result = self.check_health().await;
        let elapsed = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthStatus::healthy(elapsed),
            Err(e) => HealthStatus::unhealthy(e.to_string(), elapsed),
        }
    }
}
