use std::future::Future;

use bb8::{ManageConnection, Pool};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlSslMode};
use sqlx::{ConnectOptions, Connection};

use crate::error::ContactsDbError;
use crate::pool::{ConfigAndPool, MiddlewarePool, PoolOptions};
use crate::types::DatabaseType;

pub const DEFAULT_PORT: u16 = 3306;

/// Options for configuring a `MySQL` pool.
#[derive(Clone)]
pub struct MySqlOptions {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// PEM content of the CA that signed the server certificate.
    pub ca_certificate_pem: Option<String>,
    pub pool: PoolOptions,
}

// Keeps the password and certificate out of logs.
impl std::fmt::Debug for MySqlOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("tls", &self.has_ca_certificate())
            .field("pool", &self.pool)
            .finish()
    }
}

impl MySqlOptions {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            ca_certificate_pem: None,
            pool: PoolOptions::default(),
        }
    }

    #[must_use]
    pub fn has_ca_certificate(&self) -> bool {
        self.ca_certificate_pem
            .as_deref()
            .is_some_and(|pem| !pem.trim().is_empty())
    }

    /// Driver options. With a CA certificate the server must present a certificate
    /// signed by it; without one TLS is attempted but not required.
    #[must_use]
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let opts = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database);

        match &self.ca_certificate_pem {
            Some(pem) if self.has_ca_certificate() => opts
                .ssl_mode(MySqlSslMode::VerifyCa)
                .ssl_ca_from_pem(pem.as_bytes().to_vec()),
            _ => opts.ssl_mode(MySqlSslMode::Preferred),
        }
    }
}

/// Fluent builder for `MySQL` options.
#[derive(Debug, Clone)]
pub struct MySqlOptionsBuilder {
    opts: MySqlOptions,
}

impl MySqlOptionsBuilder {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            opts: MySqlOptions::new(host, database, user, password),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn ca_certificate_pem(mut self, pem: impl Into<String>) -> Self {
        self.opts.ca_certificate_pem = Some(pem.into());
        self
    }

    #[must_use]
    pub fn pool_options(mut self, pool: PoolOptions) -> Self {
        self.opts.pool = pool;
        self
    }

    #[must_use]
    pub fn finish(self) -> MySqlOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for `MySQL`.
    ///
    /// # Errors
    ///
    /// Returns `ContactsDbError` if the server cannot be reached.
    pub async fn build(self) -> Result<ConfigAndPool, ContactsDbError> {
        ConfigAndPool::new_mysql(self.finish()).await
    }
}

/// bb8 manager for sqlx `MySQL` connections.
pub struct MySqlManager {
    options: MySqlConnectOptions,
}

impl MySqlManager {
    #[must_use]
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }
}

impl ManageConnection for MySqlManager {
    type Connection = MySqlConnection;
    type Error = sqlx::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let options = self.options.clone();
        async move { options.connect().await }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move { conn.ping().await }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

impl ConfigAndPool {
    #[must_use]
    pub fn mysql_builder(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> MySqlOptionsBuilder {
        MySqlOptionsBuilder::new(host, database, user, password)
    }

    /// Asynchronous initializer for `ConfigAndPool` with `MySQL` using bb8.
    ///
    /// # Errors
    /// Returns `ContactsDbError::ConfigError` if host, database or user is empty, or
    /// `ContactsDbError::MySqlError` if the persistent connections cannot be opened
    /// within the pool timeout.
    pub async fn new_mysql(opts: MySqlOptions) -> Result<Self, ContactsDbError> {
        if opts.host.is_empty() {
            return Err(ContactsDbError::ConfigError("host is required".to_string()));
        }
        if opts.database.is_empty() {
            return Err(ContactsDbError::ConfigError(
                "database is required".to_string(),
            ));
        }
        if opts.user.is_empty() {
            return Err(ContactsDbError::ConfigError("user is required".to_string()));
        }

        tracing::debug!(
            host = %opts.host,
            port = opts.port,
            database = %opts.database,
            tls = opts.has_ca_certificate(),
            "building mysql pool"
        );
        let manager = MySqlManager::new(opts.connect_options());
        let pool = opts.pool.apply(Pool::builder()).build(manager).await?;

        Ok(ConfigAndPool {
            pool: MiddlewarePool::MySql(pool),
            db_type: DatabaseType::MySql,
            options: opts.pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let opts = MySqlOptions::new("db.internal", "contacts", "app", "hunter2");
        let rendered = format!("{opts:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("db.internal"));
    }

    #[test]
    fn blank_certificate_does_not_enable_verification() {
        let opts = MySqlOptionsBuilder::new("h", "d", "u", "p")
            .ca_certificate_pem("  \n")
            .finish();
        assert!(!opts.has_ca_certificate());
    }

    #[tokio::test]
    async fn empty_host_is_a_config_error() {
        let opts = MySqlOptions::new("", "contacts", "app", "pw");
        let err = ConfigAndPool::new_mysql(opts).await.unwrap_err();
        assert!(matches!(err, ContactsDbError::ConfigError(_)));
    }
}
