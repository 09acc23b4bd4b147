use crate::error::ContactsDbError;
use crate::pool::MiddlewarePoolConnection;
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "mysql")]
use crate::mysql;
#[cfg(feature = "sqlite")]
use crate::sqlite;

// Statements use `?` placeholders, which both backends accept unchanged.
impl MiddlewarePoolConnection {
    /// Executes parameterless statements (DDL) by delegating to the specific database module.
    ///
    /// # Errors
    /// Returns an error if the backend rejects any statement.
    pub async fn execute_batch(&mut self, query: &str) -> Result<(), ContactsDbError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::MySql(conn) => mysql::execute_batch(conn, query).await,
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => sqlite::execute_batch(conn, query).await,
        }
    }

    /// Executes a SELECT with bound parameters and returns every row.
    ///
    /// # Errors
    /// Returns an error if the statement fails or a value cannot be decoded.
    pub async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, ContactsDbError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::MySql(conn) => {
                mysql::execute_select(conn, query, params).await
            }
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_select(conn, query, params).await
            }
        }
    }

    /// Executes one INSERT/UPDATE/DELETE with bound parameters, committed before returning.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Errors
    /// Returns an error if the statement or its commit fails; nothing is committed then.
    pub async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, ContactsDbError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::MySql(conn) => mysql::execute_dml(conn, query, params).await,
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_dml(conn, query, params).await
            }
        }
    }
}
