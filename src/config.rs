//! Environment-driven configuration.
//!
//! | variable | meaning |
//! |---|---|
//! | `DB_BACKEND` | `mysql` (default) or `sqlite` |
//! | `DBHOST`, `DBPORT`, `DBNAME`, `DBUSER`, `DBPASSWORD` | `MySQL` connection |
//! | `CERTIFICATE` | PEM content of the CA used to verify the `MySQL` server |
//! | `SQLITE_PATH` | database file for the `sqlite` backend |
//! | `DB_POOL_SIZE`, `DB_MAX_OVERFLOW`, `DB_POOL_TIMEOUT_SECS`, `DB_POOL_RECYCLE_SECS` | pool overrides |
//! | `SECRET_KEY` | session signing key for the web front end |
//! | `PORT` | listening port for the web front end |
//!
//! Missing credentials are not an error: the database section is simply absent and the
//! data-access layer starts disconnected. Values that are present but malformed are
//! reported as [`ContactsDbError::ConfigError`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;

use crate::error::ContactsDbError;
use crate::pool::PoolOptions;
use crate::types::DatabaseType;

#[cfg(feature = "mysql")]
use crate::mysql::{MySqlOptions, config::DEFAULT_PORT};
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteOptions;

pub const DEFAULT_LISTEN_PORT: u16 = 5000;

/// Which database to connect to, and how.
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    #[cfg(feature = "mysql")]
    MySql(MySqlOptions),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
}

impl DatabaseConfig {
    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "mysql")]
            DatabaseConfig::MySql(_) => DatabaseType::MySql,
            #[cfg(feature = "sqlite")]
            DatabaseConfig::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    #[must_use]
    pub fn pool_options(&self) -> PoolOptions {
        match self {
            #[cfg(feature = "mysql")]
            DatabaseConfig::MySql(opts) => opts.pool,
            #[cfg(feature = "sqlite")]
            DatabaseConfig::Sqlite(opts) => opts.pool,
        }
    }
}

#[cfg(feature = "mysql")]
impl From<MySqlOptions> for DatabaseConfig {
    fn from(opts: MySqlOptions) -> Self {
        DatabaseConfig::MySql(opts)
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteOptions> for DatabaseConfig {
    fn from(opts: SqliteOptions) -> Self {
        DatabaseConfig::Sqlite(opts)
    }
}

/// Everything the application reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when the credentials for the selected backend are incomplete.
    pub database: Option<DatabaseConfig>,
    pub secret_key: String,
    pub port: u16,
}

impl AppConfig {
    /// Read the process environment, after loading a `.env` file if one exists.
    ///
    /// # Errors
    /// Returns `ContactsDbError::ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ContactsDbError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `ContactsDbError::ConfigError` if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContactsDbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = match get("DB_BACKEND") {
            Some(name) => <DatabaseType as ValueEnum>::from_str(name.trim(), true).map_err(|_| {
                ContactsDbError::ConfigError(format!("DB_BACKEND: unknown backend {name:?}"))
            })?,
            None => default_backend(),
        };

        let pool = pool_options(&get)?;
        let database = match backend {
            #[cfg(feature = "mysql")]
            DatabaseType::MySql => mysql_options(&get, pool)?.map(DatabaseConfig::MySql),
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => get("SQLITE_PATH").map(|path| {
                DatabaseConfig::Sqlite(SqliteOptions::new(PathBuf::from(path)).with_pool_options(pool))
            }),
        };

        Ok(Self {
            database,
            secret_key: get("SECRET_KEY").unwrap_or_default(),
            port: parse_var(&get, "PORT")?.unwrap_or(DEFAULT_LISTEN_PORT),
        })
    }
}

#[cfg(feature = "mysql")]
fn default_backend() -> DatabaseType {
    DatabaseType::MySql
}

#[cfg(not(feature = "mysql"))]
fn default_backend() -> DatabaseType {
    DatabaseType::Sqlite
}

#[cfg(feature = "mysql")]
fn mysql_options<G>(get: &G, pool: PoolOptions) -> Result<Option<MySqlOptions>, ContactsDbError>
where
    G: Fn(&str) -> Option<String>,
{
    let port = parse_var(get, "DBPORT")?.unwrap_or(DEFAULT_PORT);
    let (Some(host), Some(database), Some(user), Some(password)) =
        (get("DBHOST"), get("DBNAME"), get("DBUSER"), get("DBPASSWORD"))
    else {
        return Ok(None);
    };

    let mut opts = MySqlOptions::new(host, database, user, password);
    opts.port = port;
    opts.ca_certificate_pem = get("CERTIFICATE");
    opts.pool = pool;
    Ok(Some(opts))
}

fn pool_options<G>(get: &G) -> Result<PoolOptions, ContactsDbError>
where
    G: Fn(&str) -> Option<String>,
{
    let mut pool = PoolOptions::default();
    if let Some(size) = parse_var(get, "DB_POOL_SIZE")? {
        pool.pool_size = size;
    }
    if let Some(overflow) = parse_var(get, "DB_MAX_OVERFLOW")? {
        pool.max_overflow = overflow;
    }
    if let Some(secs) = parse_var(get, "DB_POOL_TIMEOUT_SECS")? {
        pool.pool_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = parse_var(get, "DB_POOL_RECYCLE_SECS")? {
        pool.recycle = Duration::from_secs(secs);
    }
    Ok(pool)
}

fn parse_var<G, T>(get: &G, key: &str) -> Result<Option<T>, ContactsDbError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ContactsDbError::ConfigError(format!("{key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn full_mysql_environment() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DBHOST", "db.example.com"),
            ("DBPORT", "25060"),
            ("DBNAME", "contacts"),
            ("DBUSER", "app"),
            ("DBPASSWORD", "pw"),
            ("CERTIFICATE", "-----BEGIN CERTIFICATE-----\n..."),
            ("SECRET_KEY", "s3cret"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        let Some(DatabaseConfig::MySql(opts)) = cfg.database else {
            panic!("expected mysql config");
        };
        assert_eq!(opts.port, 25060);
        assert!(opts.has_ca_certificate());
        assert_eq!(opts.pool, PoolOptions::default());
        assert_eq!(cfg.secret_key, "s3cret");
        assert_eq!(cfg.port, 8080);
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn missing_credentials_leave_database_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[("DBHOST", "db"), ("DBNAME", "contacts")]))
            .unwrap();
        assert!(cfg.database.is_none());
        assert_eq!(cfg.port, DEFAULT_LISTEN_PORT);
    }

    #[test]
    fn malformed_port_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ContactsDbError::ConfigError(ref m) if m.starts_with("PORT")));
    }

    #[test]
    fn unknown_backend_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("DB_BACKEND", "oracle")])).unwrap_err();
        assert!(matches!(err, ContactsDbError::ConfigError(_)));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_backend_with_pool_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DB_BACKEND", "SQLite"),
            ("SQLITE_PATH", "/tmp/contacts.db"),
            ("DB_POOL_SIZE", "2"),
            ("DB_MAX_OVERFLOW", "1"),
            ("DB_POOL_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        let db = cfg.database.expect("sqlite config");
        assert_eq!(db.db_type(), DatabaseType::Sqlite);
        let pool = db.pool_options();
        assert_eq!(pool.max_connections(), 3);
        assert_eq!(pool.pool_timeout, Duration::from_secs(3));
        assert_eq!(pool.recycle, Duration::from_secs(3600));
    }
}
