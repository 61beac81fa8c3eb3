use mongodb::bson::{Document, doc};
use mongodb::event::EventHandler;
use mongodb::event::sdam::SdamEvent;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::DocumentStoreConfig;
use crate::common::{
    ConnectionEvent, ConnectionEvents, ConnectionObserver, Liveness, LivenessTracker,
    StorageResult,
};

/// Collection holding user accounts
pub const USERS_COLLECTION: &str = "users";

/// Collection holding file metadata
pub const FILES_COLLECTION: &str = "files";

/// Client for the files-manager document store
///
/// Building the client does not wait for the server. The driver monitors the
/// server in the background and its heartbeat events drive [`is_alive`].
/// Until a heartbeat succeeds the client reports not alive, and operations
/// fail once the server selection timeout elapses.
///
/// Share it behind an `Arc`; all operations take `&self`.
///
/// [`is_alive`]: DocumentStoreClient::is_alive
#[derive(Debug)]
pub struct DocumentStoreClient {
    client: Client,
    database: Database,
    events: ConnectionEvents,
    liveness: Liveness,
}

impl DocumentStoreClient {
    /// Build the driver client from `config` and start server monitoring.
    ///
    /// Only an invalid URL or invalid options make this fail; an unreachable
    /// server is not an error here.
    ///
    /// # Example
    /// ```ignore
    /// use core_config::FromEnv;
    /// use storage::mongodb::{DocumentStoreClient, DocumentStoreConfig};
    ///
    /// let config = DocumentStoreConfig::from_env()?;
    /// let db = DocumentStoreClient::connect(&config).await?;
    /// let users = db.count_users().await?;
    /// ```
    pub async fn connect(config: &DocumentStoreConfig) -> StorageResult<Self> {
        let url = config.url();
        info!(%url, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(&url).await?;
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        if let Some(ref app_name) = config.app_name {
            options.app_name = Some(app_name.clone());
        }

        let events = ConnectionEvents::new();
        let liveness = Liveness::pending();
        events.subscribe(Arc::new(LivenessTracker::new("mongodb", liveness.clone())));
        options.sdam_event_handler = Some(heartbeat_handler(events.clone()));

        let client = Client::with_options(options)?;
        let database = client.database(config.database());

        debug!(database = config.database(), "MongoDB client created, monitoring started");

        Ok(Self {
            client,
            database,
            events,
            liveness,
        })
    }

    /// Whether the most recent server heartbeat succeeded. No I/O.
    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Number of documents in the `users` collection
    #[instrument(skip(self))]
    pub async fn count_users(&self) -> StorageResult<u64> {
        self.count(USERS_COLLECTION).await
    }

    /// Number of documents in the `files` collection
    #[instrument(skip(self))]
    pub async fn count_files(&self) -> StorageResult<u64> {
        self.count(FILES_COLLECTION).await
    }

    async fn count(&self, collection: &str) -> StorageResult<u64> {
        let count = self
            .database
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await?;

        debug!(collection, count, "Counted documents");
        Ok(count)
    }

    /// Handle to the `users` collection. Not validated against the server.
    pub fn users_collection<T: Send + Sync>(&self) -> Collection<T> {
        self.database.collection(USERS_COLLECTION)
    }

    /// Handle to the `files` collection. Not validated against the server.
    pub fn files_collection<T: Send + Sync>(&self) -> Collection<T> {
        self.database.collection(FILES_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Register an observer for connection events
    pub fn subscribe(&self, observer: Arc<dyn ConnectionObserver>) {
        self.events.subscribe(observer);
    }

    /// Close the driver client and stop server monitoring
    pub async fn shutdown(self) {
        info!("Closing MongoDB client");
        self.client.shutdown().await;
    }
}

/// Translate driver heartbeats into connection events
fn heartbeat_handler(events: ConnectionEvents) -> EventHandler<SdamEvent> {
    EventHandler::callback(move |event: SdamEvent| match event {
        SdamEvent::ServerHeartbeatSucceeded(_) => events.emit(ConnectionEvent::Connected),
        SdamEvent::ServerHeartbeatFailed(failed) => events.emit(ConnectionEvent::error(format!(
            "{}: {}",
            failed.server_address, failed.failure
        ))),
        _ => {}
    })
}
