//! Record source backed by a PostgreSQL connection pool.
//!
//! The pool is created lazily at startup so an unreachable database never
//! stops the server from coming up; connection failures surface per request.
//! Each call acquires one pooled connection (pinged before use), runs the fixed
//! query on it and returns it to the pool when the guard drops, on every exit
//! path.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::FromRow;

use crate::config::{DatabaseConfig, SELECT_RECORDS};
use crate::record::Record;

/// Failure while loading records, split by the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Row decode failed: {0}")]
    Decode(#[source] sqlx::Error),
}

/// Source of the ordered record set served by the chart data endpoint.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns every record ordered by id ascending, or nothing at all.
    async fn fetch_records(&self) -> Result<Vec<Record>, DbError>;
}

/// `RecordSource` reading `template_data` through a bounded pool.
#[derive(Clone)]
pub struct PgRecordSource {
    pool: PgPool,
}

impl PgRecordSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a lazily connecting pool from the database configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .test_before_acquire(true)
            .connect_lazy_with(connect_options(config));
        Self::new(pool)
    }
}

#[async_trait]
impl RecordSource for PgRecordSource {
    async fn fetch_records(&self) -> Result<Vec<Record>, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connection)?;

        let mut rows = sqlx::query(SELECT_RECORDS).fetch(&mut *conn);
        let mut records = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(DbError::Query)? {
            records.push(Record::from_row(&row).map_err(DbError::Decode)?);
        }

        tracing::debug!(count = records.len(), "Fetched records");
        Ok(records)
    }
}

/// Connect options for the configured database. TLS is disabled.
///
/// Unset fields keep the driver defaults (`PGHOST`, `PGPORT`, ... env vars,
/// then `localhost:5432`).
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new().ssl_mode(PgSslMode::Disable);
    if let Some(host) = &config.host {
        options = options.host(host);
    }
    if let Some(port) = config.port {
        options = options.port(port);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(name) = &config.name {
        options = options.database(name);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str, port: u16) -> DatabaseConfig {
        DatabaseConfig {
            host: Some(host.to_string()),
            port: Some(port),
            user: Some("reader".to_string()),
            password: Some("secret".to_string()),
            name: Some("charts".to_string()),
            acquire_timeout_seconds: 1,
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn test_connect_options_use_configured_fields() {
        let options = connect_options(&config("db.internal", 6543));
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "reader");
        assert_eq!(options.get_database(), Some("charts"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Disable));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_connection_error() {
        // Nothing listens on port 1
        let source = PgRecordSource::connect_lazy(&config("127.0.0.1", 1));
        let err = source.fetch_records().await.unwrap_err();
        assert!(matches!(err, DbError::Connection(_)), "got {:?}", err);
    }
}
