//! Configuration loading and constants.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file, then
//! environment variables (`PORT`, `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
//! `DB_NAME`). The result is an immutable `AppConfig` built once at startup and
//! handed to the components that need it.

use const_format::formatcp;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

// =============================================================================
// Routes and Query
// =============================================================================

/// Route serving the chart records
pub const CHART_DATA_PATH: &str = "/api/chart-data";

/// Liveness probe route
pub const HEALTH_PATH: &str = "/health";

/// Externally owned table the records are projected from
pub const RECORDS_TABLE: &str = "template_data";

/// Fixed query. Column order must match the field order of `Record`; the casts
/// let `integer` and `bigint` columns both decode into `i64`.
pub const SELECT_RECORDS: &str = formatcp!(
    "SELECT id::int8 AS id, name, value::int8 AS value FROM {} ORDER BY id",
    RECORDS_TABLE
);

// =============================================================================
// CORS Header Values
// =============================================================================

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_PORT: &str = "PORT";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";

// =============================================================================
// Defaults
// =============================================================================

/// Default bind address for the HTTP listener
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP port when neither `PORT` nor the config file sets one
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Upper bound on pooled database connections
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Seconds a request waits for a pooled connection before failing
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "chart_data_server=debug,sqlx=warn";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Database connection and pool settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    /// Listen address. `host` must be an IPv4 or IPv6 literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "http.host must be an IP address, got {:?}",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// PostgreSQL connection settings.
///
/// Connection fields left unset fall through to the driver's own defaults
/// (`PGHOST`, `PGPORT`, ... then `localhost:5432`).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Database name
    pub name: Option<String>,
    /// Maximum pooled connections (default: 10)
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    /// Pool acquisition timeout in seconds (default: 5)
    #[serde(default = "DatabaseConfig::default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            user: None,
            password: None,
            name: None,
            max_connections: Self::default_max_connections(),
            acquire_timeout_seconds: Self::default_acquire_timeout(),
        }
    }
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        DEFAULT_DB_MAX_CONNECTIONS
    }

    fn default_acquire_timeout() -> u64 {
        DEFAULT_DB_ACQUIRE_TIMEOUT_SECS
    }

    /// Human-readable connection target for logs. Never includes the password.
    pub fn target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user.as_deref().unwrap_or("<default>"),
            self.host.as_deref().unwrap_or("<default>"),
            self.port
                .map(|p| p.to_string())
                .unwrap_or_else(|| "<default>".to_string()),
            self.name.as_deref().unwrap_or("<default>"),
        )
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the process environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to look up environment variables.
    pub fn load_with_env<P, F>(path: Option<P>, env: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => AppConfig::default(),
        };

        // Empty variables count as unset
        let lookup = |key: &str| env(key).filter(|value| !value.is_empty());

        if let Some(port) = lookup(ENV_PORT) {
            config.http.port = parse_port(ENV_PORT, &port)?;
        }
        if let Some(host) = lookup(ENV_DB_HOST) {
            config.database.host = Some(host);
        }
        if let Some(port) = lookup(ENV_DB_PORT) {
            config.database.port = Some(parse_port(ENV_DB_PORT, &port)?);
        }
        if let Some(user) = lookup(ENV_DB_USER) {
            config.database.user = Some(user);
        }
        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            config.database.password = Some(password);
        }
        if let Some(name) = lookup(ENV_DB_NAME) {
            config.database.name = Some(name);
        }

        config.http.socket_addr()?;

        if config.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if config.database.acquire_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "database.acquire_timeout_seconds must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("{} must be a port number, got {:?}", key, value))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
