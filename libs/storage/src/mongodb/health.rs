use mongodb::bson::doc;
use std::time::Instant;
use tracing::debug;

use super::DocumentStoreClient;
use crate::common::{HealthStatus, StorageError, StorageResult};

impl DocumentStoreClient {
    /// Actively probe the server with a `ping` command
    ///
    /// Unlike [`DocumentStoreClient::is_alive`], this performs I/O and waits
    /// up to the server selection timeout.
    pub async fn check_health(&self) -> StorageResult<()> {
        debug!("Running MongoDB health check");

        self.database()
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::HealthCheckFailed(format!("MongoDB ping failed: {}", e)))?;

        debug!("MongoDB health check passed");
        Ok(())
    }

    /// Probe the server and report timing alongside the outcome
    ///
    /// # Example
    /// ```ignore
    /// let status = db.check_health_detailed().await;
    /// if !status.healthy {
    ///     tracing::warn!(message = ?status.message, "MongoDB unhealthy");
    /// }
    /// ```
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
