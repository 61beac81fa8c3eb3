use redis::Client;
use redis::aio::MultiplexedConnection;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Throwaway Redis for cache tests, removed on drop
///
/// `connection()` reads what the client under test wrote (values, TTLs)
/// without going through it.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    inspector: MultiplexedConnection,
    url: String,
}

impl TestRedis {
    pub async fn new() -> Self {
        let container = Redis::default()
            .with_tag("8-alpine")
            .start()
            .await
            .expect("Redis container should start");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Redis port should be mapped");
        let url = format!("redis://127.0.0.1:{port}");

        let inspector = Client::open(url.as_str())
            .expect("container URL should parse")
            .get_multiplexed_async_connection()
            .await
            .expect("inspection connection should open");

        tracing::info!(%url, "Cache container up");

        Self {
            _container: container,
            inspector,
            url,
        }
    }

    pub fn connection(&self) -> MultiplexedConnection {
        self.inspector.clone()
    }

    /// URL to hand to the client under test
    pub fn connection_string(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::AsyncCommands;

    #[tokio::test]
    async fn test_inspector_sees_expiring_keys() {
        let redis = TestRedis::new().await;
        let mut conn = redis.connection();

        conn.set_ex::<_, _, ()>("session", "value", 30).await.unwrap();
        let ttl: i64 = conn.ttl("session").await.unwrap();
        assert!(ttl > 0 && ttl <= 30);
        assert!(redis.connection_string().starts_with("redis://127.0.0.1:"));
    }
}
