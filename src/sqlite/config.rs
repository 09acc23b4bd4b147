use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bb8::{ManageConnection, Pool};

use crate::error::ContactsDbError;
use crate::pool::{ConfigAndPool, MiddlewarePool, PoolOptions};
use crate::types::DatabaseType;

/// A rusqlite connection shared between the pool and the blocking worker that runs
/// statements on it.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for configuring a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: PathBuf,
    pub pool: PoolOptions,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool: PoolOptions::default(),
        }
    }

    #[must_use]
    pub fn with_pool_options(mut self, pool: PoolOptions) -> Self {
        self.pool = pool;
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn pool_options(mut self, pool: PoolOptions) -> Self {
        self.opts.pool = pool;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `ContactsDbError` if the database file cannot be opened.
    pub async fn build(self) -> Result<ConfigAndPool, ContactsDbError> {
        ConfigAndPool::new_sqlite(self.finish()).await
    }
}

/// bb8 manager for rusqlite connections.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    db_path: PathBuf,
}

impl SqliteManager {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

fn open_connection(path: &Path) -> Result<SharedSqliteConnection, ContactsDbError> {
    let conn = rusqlite::Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;
    Ok(Arc::new(Mutex::new(conn)))
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = ContactsDbError;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.db_path.clone();
        async move {
            tokio::task::spawn_blocking(move || open_connection(&path))
                .await
                .map_err(|e| {
                    ContactsDbError::ConnectionError(format!("sqlite open task failed: {e}"))
                })?
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let handle = Arc::clone(conn);
        async move {
            run_blocking(handle, |conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))
                    .map_err(ContactsDbError::SqliteError)
            })
            .await
        }
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.is_poisoned()
    }
}

/// Run `func` against the connection on tokio's blocking thread pool.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, ContactsDbError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, ContactsDbError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.lock().map_err(|_| {
            ContactsDbError::ConnectionError("sqlite connection lock poisoned".to_string())
        })?;
        func(&mut guard)
    })
    .await
    .map_err(|e| ContactsDbError::ExecutionError(format!("sqlite worker join error: {e}")))?
}

impl ConfigAndPool {
    #[must_use]
    pub fn sqlite_builder(db_path: impl Into<PathBuf>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Asynchronous initializer for `ConfigAndPool` with `SQLite` using bb8.
    ///
    /// The pool opens its persistent connections before returning, so an unusable path
    /// fails here rather than on first use.
    ///
    /// # Errors
    /// Returns `ContactsDbError` if a connection cannot be opened within the pool timeout.
    pub async fn new_sqlite(opts: SqliteOptions) -> Result<Self, ContactsDbError> {
        tracing::debug!(path = %opts.db_path.display(), "building sqlite pool");
        let manager = SqliteManager::new(opts.db_path);
        let pool = opts.pool.apply(Pool::builder()).build(manager).await?;

        Ok(ConfigAndPool {
            pool: MiddlewarePool::Sqlite(pool),
            db_type: DatabaseType::Sqlite,
            options: opts.pool,
        })
    }
}
