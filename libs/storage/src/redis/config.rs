use std::time::Duration;

/// Endpoint the cache targets when nothing else is configured
pub const DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Cache connection settings
///
/// The cache is not configured from the environment; production code uses
/// [`CacheConfig::default`], tests point it at a container.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use storage::redis::CacheConfig;
///
/// let config = CacheConfig::new("redis://127.0.0.1:49154")
///     .with_connect_timeout(Duration::from_millis(500))
///     .without_heartbeat();
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Upper bound for establishing the connection
    pub connect_timeout: Duration,

    /// How often the background task PINGs the server; `None` disables it
    pub heartbeat_interval: Option<Duration>,
}

impl CacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Only the startup attempt and command failures report connection state
    pub fn without_heartbeat(mut self) -> Self {
        self.heartbeat_interval = None;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            heartbeat_interval: Some(Duration::from_secs(5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_local_redis() {
        let config = CacheConfig::default();
        assert_eq!(config.url(), "redis://127.0.0.1:6379");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.heartbeat_interval, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_builders() {
        let config = CacheConfig::new("redis://cache:6380")
            .with_connect_timeout(Duration::from_millis(250))
            .with_heartbeat_interval(Duration::from_secs(1));
        assert_eq!(config.url(), "redis://cache:6380");
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.heartbeat_interval, Some(Duration::from_secs(1)));

        let config = config.without_heartbeat();
        assert_eq!(config.heartbeat_interval, None);
    }
}
