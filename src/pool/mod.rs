pub mod connection;
pub mod types;

pub use connection::MiddlewarePoolConnection;
pub use types::{MiddlewarePool, PoolOptions};

use crate::error::ContactsDbError;
use crate::types::DatabaseType;

/// Configuration and connection pool for a database
///
/// This struct holds the pool together with the options it was built from,
/// so callers can tell how many persistent connections to expect.
#[derive(Clone, Debug)]
pub struct ConfigAndPool {
    /// The connection pool
    pub pool: MiddlewarePool,
    /// The database type
    pub db_type: DatabaseType,
    /// The pool tuning the pool was built with
    pub options: PoolOptions,
}

impl ConfigAndPool {
    /// Check out a connection; it goes back to the pool when dropped.
    ///
    /// # Errors
    /// Returns `ContactsDbError` if the pool cannot hand out a connection within the pool timeout.
    pub async fn get_connection(&self) -> Result<MiddlewarePoolConnection, ContactsDbError> {
        self.pool.get_connection().await
    }
}

/// Whether a data-access layer holds a live pool.
#[derive(Debug, Clone, Default)]
pub enum PoolState {
    Connected(ConfigAndPool),
    #[default]
    Disconnected,
}

impl PoolState {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, PoolState::Connected(_))
    }
}
