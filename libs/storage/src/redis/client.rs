use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument};

use super::{CacheConfig, CacheValue};
use crate::common::error::is_transport_failure;
use crate::common::{
    ConnectionEvent, ConnectionEvents, ConnectionObserver, Liveness, LivenessTracker,
    StorageError, StorageResult,
};

/// Client for the files-manager cache
///
/// Construction never waits for Redis. A background task makes the first
/// connection attempt and then PINGs on the configured heartbeat interval;
/// both publish [`ConnectionEvent`]s that keep [`is_alive`] current. The
/// flag starts optimistic (`true`) and only the event observers change it.
///
/// Must be created inside a Tokio runtime; outside one construction fails
/// with [`StorageError::Unavailable`]. Dropping the client stops the
/// background task; share it behind an `Arc`.
///
/// [`is_alive`]: CacheClient::is_alive
pub struct CacheClient {
    shared: Arc<Shared>,
    monitor: JoinHandle<()>,
}

struct Shared {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    connect_timeout: Duration,
    events: ConnectionEvents,
    liveness: Liveness,
}

impl CacheClient {
    /// Client for the default local endpoint
    pub fn new() -> StorageResult<Self> {
        Self::with_config(CacheConfig::default())
    }

    /// Client for a specific endpoint
    ///
    /// Fails when the URL cannot be parsed or no Tokio runtime is running.
    ///
    /// # Example
    /// ```ignore
    /// use storage::redis::{CacheClient, CacheConfig};
    ///
    /// let cache = CacheClient::with_config(CacheConfig::new("redis://127.0.0.1:6379"))?;
    /// cache.set("auth_token", "user-id", 86_400).await?;
    /// ```
    pub fn with_config(config: CacheConfig) -> StorageResult<Self> {
        let client = Client::open(config.url())?;
        let runtime = Handle::try_current().map_err(|e| {
            StorageError::Unavailable(format!("cache client needs a Tokio runtime: {e}"))
        })?;

        let events = ConnectionEvents::new();
        let liveness = Liveness::optimistic();
        events.subscribe(Arc::new(LivenessTracker::new("redis", liveness.clone())));

        let shared = Arc::new(Shared {
            client,
            connection: OnceCell::new(),
            connect_timeout: config.connect_timeout,
            events,
            liveness,
        });

        info!(url = config.url(), "Connecting to Redis");
        let monitor = runtime.spawn(run_monitor(shared.clone(), config.heartbeat_interval));

        Ok(Self { shared, monitor })
    }

    /// Current liveness flag. No I/O.
    pub fn is_alive(&self) -> bool {
        self.shared.liveness.is_alive()
    }

    /// Value stored at `key`, or `None` when the key does not exist
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.shared.connection().await?;
        let value = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| self.shared.transport_error(e))?;

        debug!(hit = value.is_some(), "Cache lookup");
        Ok(value)
    }

    /// Store `value` under `key`, expiring after `ttl_seconds`
    ///
    /// Overwrites any existing value and resets its expiration. Redis rejects
    /// a zero TTL; that error is returned as-is.
    #[instrument(skip(self, value))]
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<CacheValue>,
        ttl_seconds: u64,
    ) -> StorageResult<()> {
        let value = value.into();
        let mut conn = self.shared.connection().await?;
        conn.set_ex::<_, _, ()>(key, value.to_string(), ttl_seconds)
            .await
            .map_err(|e| self.shared.transport_error(e))?;

        Ok(())
    }

    /// Remove `key`; a missing key is not an error
    #[instrument(skip(self))]
    pub async fn del(&self, key: &str) -> StorageResult<()> {
        let mut conn = self.shared.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| self.shared.transport_error(e))?;

        Ok(())
    }

    /// Register an observer for connection events
    pub fn subscribe(&self, observer: Arc<dyn ConnectionObserver>) {
        self.shared.events.subscribe(observer);
    }

    /// Stop the background connection task
    ///
    /// Established connections stay usable; only heartbeats stop.
    pub fn shutdown(&self) {
        if !self.monitor.is_finished() {
            info!("Stopping Redis heartbeat");
        }
        self.monitor.abort();
    }

    pub(super) async fn connection(&self) -> StorageResult<ConnectionManager> {
        self.shared.connection().await
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> &ConnectionEvents {
        &self.shared.events
    }
}

impl Drop for CacheClient {
    fn drop(&mut self) {
        self.monitor.abort();
    }
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheClient")
            .field("alive", &self.is_alive())
            .field("connected", &self.shared.connection.initialized())
            .field("events", &self.shared.events)
            .finish()
    }
}

impl Shared {
    /// The shared connection, established on first use
    ///
    /// Concurrent first callers wait on a single attempt. A failed attempt
    /// leaves the cell empty so the next caller tries again.
    async fn connection(&self) -> StorageResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| self.establish())
            .await?;
        Ok(manager.clone())
    }

    async fn establish(&self) -> StorageResult<ConnectionManager> {
        debug!("Opening Redis connection");

        match tokio::time::timeout(
            self.connect_timeout,
            ConnectionManager::new(self.client.clone()),
        )
        .await
        {
            Ok(Ok(manager)) => {
                self.events.emit(ConnectionEvent::Connected);
                Ok(manager)
            }
            Ok(Err(e)) => {
                let message = e.to_string();
                self.events.emit(ConnectionEvent::error(message.clone()));
                Err(StorageError::Unavailable(message))
            }
            Err(_) => {
                let message = format!("connection timed out after {:?}", self.connect_timeout);
                self.events.emit(ConnectionEvent::error(message.clone()));
                Err(StorageError::Unavailable(message))
            }
        }
    }

    /// Publish transport-level failures, then hand the error back unchanged
    fn transport_error(&self, err: RedisError) -> StorageError {
        if is_transport_failure(&err) {
            self.events.emit(ConnectionEvent::error(err.to_string()));
        }
        StorageError::Redis(err)
    }

    async fn heartbeat(&self) {
        // A failed connection attempt has already been published
        let Ok(mut conn) = self.connection().await else {
            return;
        };

        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => self.events.emit(ConnectionEvent::Connected),
            Err(e) => self.events.emit(ConnectionEvent::error(e.to_string())),
        }
    }
}

/// Startup connection attempt followed by periodic heartbeats
async fn run_monitor(shared: Arc<Shared>, heartbeat: Option<Duration>) {
    if let Err(e) = shared.connection().await {
        debug!(error = %e, "Initial Redis connection attempt failed");
    }

    let Some(period) = heartbeat else {
        return;
    };

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        shared.heartbeat().await;
    }
}
