use std::time::Duration;

use bb8::{Builder, ManageConnection};

#[cfg(feature = "mysql")]
use crate::mysql::MySqlManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

/// Pool tuning shared by every backend.
///
/// `pool_size` connections are kept open; up to `max_overflow` more are opened
/// under load and reaped after `overflow_idle_timeout` of idleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub pool_size: u32,
    pub max_overflow: u32,
    /// How long a caller waits for a free connection before failing
    pub pool_timeout: Duration,
    /// Connections older than this are discarded and replaced
    pub recycle: Duration,
    /// Run the backend liveness check before handing a connection out
    pub pre_ping: bool,
    pub overflow_idle_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            pool_size: 5,
            max_overflow: 10,
            pool_timeout: Duration::from_secs(30),
            recycle: Duration::from_secs(3600),
            pre_ping: true,
            overflow_idle_timeout: Duration::from_secs(600),
        }
    }
}

impl PoolOptions {
    /// Upper bound on physical connections.
    #[must_use]
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow).max(1)
    }

    pub(crate) fn apply<M: ManageConnection>(&self, builder: Builder<M>) -> Builder<M> {
        builder
            .max_size(self.max_connections())
            .min_idle(Some(self.pool_size.min(self.max_connections())))
            .connection_timeout(self.pool_timeout)
            .max_lifetime(Some(self.recycle))
            .idle_timeout(Some(self.overflow_idle_timeout))
            .test_on_check_out(self.pre_ping)
    }
}

/// Connection pool for database access
///
/// This enum wraps the bb8 pool of each supported database engine.
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `MySQL` connection pool
    #[cfg(feature = "mysql")]
    MySql(bb8::Pool<MySqlManager>),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
}

impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        let name = match self {
            #[cfg(feature = "mysql")]
            Self::MySql(_) => "MySql",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "Sqlite",
        };
        f.debug_struct(name)
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

impl MiddlewarePool {
    /// Live connection counts as reported by bb8.
    #[must_use]
    pub fn state(&self) -> bb8::State {
        match self {
            #[cfg(feature = "mysql")]
            Self::MySql(pool) => pool.state(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => pool.state(),
        }
    }
}
