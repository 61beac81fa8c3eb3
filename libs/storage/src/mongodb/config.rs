use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or_default};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_DATABASE: &str = "files_manager";

/// Document store connection settings
///
/// # Example
///
/// ```ignore
/// use storage::mongodb::DocumentStoreConfig;
///
/// // Defaults: localhost:27017/files_manager
/// let config = DocumentStoreConfig::default();
///
/// // From DB_HOST / DB_PORT / DB_DATABASE
/// let config = DocumentStoreConfig::from_env()?;
///
/// // Test containers on a random port
/// let config = DocumentStoreConfig::new("127.0.0.1", 49153, "files_manager_test");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentStoreConfig {
    /// Server host name or address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Database holding the `users` and `files` collections
    pub database: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl DocumentStoreConfig {
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Bound how long operations wait for a reachable server
    pub fn with_server_selection_timeout(mut self, secs: u64) -> Self {
        self.server_selection_timeout_secs = secs;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Connection URL: `mongodb://{host}:{port}/{database}`
    pub fn url(&self) -> String {
        format!("mongodb://{}:{}/{}", self.host, self.port, self.database)
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// Load DocumentStoreConfig from environment variables
///
/// Environment variables (all optional; empty counts as unset):
/// - `DB_HOST` (default: localhost)
/// - `DB_PORT` (default: 27017)
/// - `DB_DATABASE` (default: files_manager)
/// - `DB_APP_NAME` - Application name for server logs
/// - `DB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `DB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
impl FromEnv for DocumentStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: env_or_default("DB_HOST", DEFAULT_HOST),
            port: env_parse_or_default("DB_PORT", DEFAULT_PORT)?,
            database: env_or_default("DB_DATABASE", DEFAULT_DATABASE),
            app_name: env_optional("DB_APP_NAME"),
            connect_timeout_secs: env_parse_or_default(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse_or_default(
                "DB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB_VARS: [&str; 6] = [
        "DB_HOST",
        "DB_PORT",
        "DB_DATABASE",
        "DB_APP_NAME",
        "DB_CONNECT_TIMEOUT_SECS",
        "DB_SERVER_SELECTION_TIMEOUT_SECS",
    ];

    #[test]
    fn test_default_targets_local_files_manager() {
        let config = DocumentStoreConfig::default();
        assert_eq!(config.url(), "mongodb://localhost:27017/files_manager");
        assert_eq!(config.database(), "files_manager");
        assert_eq!(config.app_name, None);
    }

    #[test]
    fn test_from_env_unset_uses_defaults() {
        temp_env::with_vars_unset(DB_VARS, || {
            let config = DocumentStoreConfig::from_env().unwrap();
            assert_eq!(config, DocumentStoreConfig::default());
            assert_eq!(config.url(), "mongodb://localhost:27017/files_manager");
        });
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("DB_HOST", Some("mongo.internal")),
                ("DB_PORT", Some("27018")),
                ("DB_DATABASE", Some("uploads")),
                ("DB_APP_NAME", Some("files-manager")),
                ("DB_SERVER_SELECTION_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = DocumentStoreConfig::from_env().unwrap();
                assert_eq!(config.url(), "mongodb://mongo.internal:27018/uploads");
                assert_eq!(config.app_name.as_deref(), Some("files-manager"));
                assert_eq!(config.server_selection_timeout_secs, 5);
                assert_eq!(config.connect_timeout_secs, 10);
            },
        );
    }

    #[test]
    fn test_from_env_partial_override() {
        temp_env::with_vars(
            [
                ("DB_HOST", None),
                ("DB_PORT", None),
                ("DB_DATABASE", Some("other_db")),
            ],
            || {
                let config = DocumentStoreConfig::from_env().unwrap();
                assert_eq!(config.url(), "mongodb://localhost:27017/other_db");
            },
        );
    }

    #[test]
    fn test_from_env_empty_values_use_defaults() {
        temp_env::with_vars(
            [
                ("DB_HOST", Some("")),
                ("DB_PORT", Some("")),
                ("DB_DATABASE", Some("")),
            ],
            || {
                let config = DocumentStoreConfig::from_env().unwrap();
                assert_eq!(config.url(), "mongodb://localhost:27017/files_manager");
            },
        );

        temp_env::with_vars(
            [
                ("DB_HOST", Some("")),
                ("DB_PORT", None),
                ("DB_DATABASE", Some("")),
            ],
            || {
                let config = DocumentStoreConfig::from_env().unwrap();
                assert_eq!(config.url(), "mongodb://localhost:27017/files_manager");
            },
        );
    }

    #[test]
    fn test_from_env_invalid_port() {
        temp_env::with_var("DB_PORT", Some("mongo"), || {
            let err = DocumentStoreConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DB_PORT"));
        });
    }

    #[test]
    fn test_builders() {
        let config = DocumentStoreConfig::new("127.0.0.1", 49153, "files_manager_test")
            .with_app_name("tests")
            .with_server_selection_timeout(2)
            .with_connect_timeout(1);
        assert_eq!(config.url(), "mongodb://127.0.0.1:49153/files_manager_test");
        assert_eq!(config.app_name.as_deref(), Some("tests"));
        assert_eq!(config.server_selection_timeout_secs, 2);
        assert_eq!(config.connect_timeout_secs, 1);
    }
}
