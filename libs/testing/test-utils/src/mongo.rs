//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that runs MongoDB in a container.

use mongodb::Client;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.client().database("files_manager");
/// // Seed documents through `db`, point the code under test at
/// // `mongo.host` / `mongo.port`
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub host: String,
    pub port: u16,
}

impl TestMongo {
    /// Start a MongoDB 7 container and connect a seeding client to it
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let host = "127.0.0.1".to_string();
        let client = Client::with_uri_str(format!("mongodb://{}:{}", host, port))
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port, "Test MongoDB ready (mongo 7)");

        Self {
            container,
            client,
            host,
            port,
        }
    }

    /// Client for seeding and inspecting data outside the code under test
    pub fn client(&self) -> Client {
        self.client.clone()
    }
}
