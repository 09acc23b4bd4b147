//! The contacts data-access layer.
//!
//! [`ContactsDb`] owns the connection pool and exposes one method per logical
//! operation. Every method checks out its own connection, runs a single
//! parameterized statement, and drops the connection back into the pool before
//! returning, on success and failure alike.
//!
//! A layer whose pool could not be built (or that has been closed) is
//! [`PoolState::Disconnected`]: its methods return `Ok` with the operation's empty
//! value (`None`, `false`, an empty list, or `()`) without touching the network.

mod auth;
mod contacts;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::config::{AppConfig, DatabaseConfig};
use crate::error::{ContactsDbError, DataAccessError, Operation};
use crate::pool::{ConfigAndPool, MiddlewarePoolConnection, PoolState};
use crate::results::CustomDbRow;
use crate::schema;
use crate::types::{DatabaseType, RowValues};

/// Snapshot of the pool for health endpoints and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub connected: bool,
    pub backend: Option<DatabaseType>,
    pub connections: u32,
    pub idle_connections: u32,
}

/// Pooled access to the `login` and `contact` tables.
#[derive(Debug)]
pub struct ContactsDb {
    state: RwLock<PoolState>,
}

impl ContactsDb {
    /// Build the pool described by `config` and warm it up.
    ///
    /// Any failure is logged and yields a disconnected layer rather than an error.
    pub async fn connect(config: impl Into<DatabaseConfig>) -> Self {
        let config = config.into();
        let db_type = config.db_type();
        match open_pool(config).await {
            Ok(cap) => {
                tracing::info!(backend = %db_type, "connected to the database");
                Self::from_pool(cap)
            }
            Err(err) => {
                tracing::warn!(backend = %db_type, error = %err, "error connecting to the database");
                Self::disconnected()
            }
        }
    }

    /// Read [`AppConfig`] from the environment and connect.
    pub async fn from_env() -> Self {
        match AppConfig::from_env() {
            Ok(AppConfig {
                database: Some(database),
                ..
            }) => Self::connect(database).await,
            Ok(_) => {
                tracing::warn!("database credentials are not configured");
                Self::disconnected()
            }
            Err(err) => {
                tracing::warn!(error = %err, "invalid database configuration");
                Self::disconnected()
            }
        }
    }

    /// Wrap an already-built pool. No warmup is performed.
    #[must_use]
    pub fn from_pool(cap: ConfigAndPool) -> Self {
        Self {
            state: RwLock::new(PoolState::Connected(cap)),
        }
    }

    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            state: RwLock::new(PoolState::Disconnected),
        }
    }

    /// True iff the layer holds a live pool.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.read_state().is_connected()
    }

    /// Release the pool. Idle connections close immediately, checked-out ones when
    /// their operation finishes. Calling it again does nothing.
    pub fn close(&self) {
        let previous = std::mem::take(&mut *self.write_state());
        if let PoolState::Connected(cap) = previous {
            drop(cap);
            tracing::info!("connection to the database closed");
        }
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        match &*self.read_state() {
            PoolState::Connected(cap) => {
                let state = cap.pool.state();
                PoolStatus {
                    connected: true,
                    backend: Some(cap.db_type),
                    connections: state.connections,
                    idle_connections: state.idle_connections,
                }
            }
            PoolState::Disconnected => PoolStatus {
                connected: false,
                backend: None,
                connections: 0,
                idle_connections: 0,
            },
        }
    }

    /// Create the `login` and `contact` tables if they do not exist.
    ///
    /// # Errors
    /// Returns `DataAccessError` if a DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DataAccessError> {
        let op = Operation::EnsureSchema;
        let Some((db_type, mut conn)) = self.checkout_typed(op).await? else {
            return Ok(());
        };
        for stmt in schema::statements(db_type) {
            conn.execute_batch(stmt).await.map_err(fail(op))?;
        }
        tracing::info!(backend = %db_type, "schema ensured");
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PoolState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PoolState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone the pool handle out so no lock is held across an await.
    fn pool(&self) -> Option<ConfigAndPool> {
        match &*self.read_state() {
            PoolState::Connected(cap) => Some(cap.clone()),
            PoolState::Disconnected => None,
        }
    }

    /// Check out a connection for `op`, or `None` when disconnected.
    pub(crate) async fn checkout(
        &self,
        op: Operation,
    ) -> Result<Option<MiddlewarePoolConnection>, DataAccessError> {
        Ok(self.checkout_typed(op).await?.map(|(_, conn)| conn))
    }

    async fn checkout_typed(
        &self,
        op: Operation,
    ) -> Result<Option<(DatabaseType, MiddlewarePoolConnection)>, DataAccessError> {
        let Some(cap) = self.pool() else {
            tracing::debug!(operation = %op, "skipped, database disconnected");
            return Ok(None);
        };
        tracing::debug!(operation = %op, backend = %cap.db_type, "checking out connection");
        let conn = cap.get_connection().await.map_err(fail(op))?;
        Ok(Some((cap.db_type, conn)))
    }
}

async fn open_pool(config: DatabaseConfig) -> Result<ConfigAndPool, ContactsDbError> {
    let cap = match config {
        #[cfg(feature = "mysql")]
        DatabaseConfig::MySql(opts) => ConfigAndPool::new_mysql(opts).await?,
        #[cfg(feature = "sqlite")]
        DatabaseConfig::Sqlite(opts) => ConfigAndPool::new_sqlite(opts).await?,
    };
    let warmed = warmup(&cap)?;
    tracing::info!(backend = %cap.db_type, connections = warmed, "database pool warmed up");
    Ok(cap)
}

/// Confirm the pool holds `pool_size` open connections before the first request.
///
/// bb8's `build` opens `min_idle = pool_size` connections and only returns once they
/// are established, so nothing is checked out here: holding them would drop the idle
/// count below `min_idle` and make bb8 open a second set.
fn warmup(cap: &ConfigAndPool) -> Result<u32, ContactsDbError> {
    let target = cap.options.pool_size.min(cap.options.max_connections());
    let open = cap.pool.state().connections;
    if open < target {
        return Err(ContactsDbError::ConnectionError(format!(
            "pool opened {open} of {target} connections"
        )));
    }
    Ok(open)
}

/// Map a backend error to the operation's `DataAccessError`, logging it once.
pub(crate) fn fail(operation: Operation) -> impl FnOnce(ContactsDbError) -> DataAccessError {
    move |source| {
        tracing::error!(%operation, error = %source, "database operation failed");
        DataAccessError::new(operation, source)
    }
}

pub(crate) fn text_column(row: &CustomDbRow, column: &str) -> Result<String, ContactsDbError> {
    row.get(column)
        .and_then(RowValues::as_text)
        .map(str::to_string)
        .ok_or_else(|| ContactsDbError::ExecutionError(format!("column {column} is not text")))
}

pub(crate) fn int_column(row: &CustomDbRow, column: &str) -> Result<i64, ContactsDbError> {
    row.get(column)
        .and_then(RowValues::as_int)
        .copied()
        .ok_or_else(|| ContactsDbError::ExecutionError(format!("column {column} is not an integer")))
}
