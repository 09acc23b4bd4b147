use bb8::PooledConnection;

#[cfg(feature = "mysql")]
use crate::mysql::MySqlManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

use super::types::MiddlewarePool;
use crate::error::ContactsDbError;

/// A connection checked out of a [`MiddlewarePool`].
///
/// The connection is owned, so it can outlive the borrow of the pool; dropping it
/// returns it to the pool.
pub enum MiddlewarePoolConnection {
    #[cfg(feature = "mysql")]
    MySql(PooledConnection<'static, MySqlManager>),
    #[cfg(feature = "sqlite")]
    Sqlite(PooledConnection<'static, SqliteManager>),
}

impl std::fmt::Debug for MiddlewarePoolConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            Self::MySql(_) => f.debug_tuple("MySql").field(&"<MySqlConnection>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<SqliteConnection>").finish(),
        }
    }
}

impl MiddlewarePool {
    /// Get a connection from the pool
    ///
    /// # Errors
    /// Returns `ContactsDbError::PoolErrorMySql` or `ContactsDbError::ConnectionError` if the
    /// pool fails to provide a connection before the pool timeout.
    pub async fn get_connection(&self) -> Result<MiddlewarePoolConnection, ContactsDbError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePool::MySql(pool) => {
                let conn = pool
                    .get_owned()
                    .await
                    .map_err(ContactsDbError::PoolErrorMySql)?;
                Ok(MiddlewarePoolConnection::MySql(conn))
            }
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => {
                let conn = pool.get_owned().await?;
                Ok(MiddlewarePoolConnection::Sqlite(conn))
            }
        }
    }
}
