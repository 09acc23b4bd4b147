use sqlx::Connection;
use sqlx::mysql::MySqlConnection;

use super::params::bind_params;
use super::query::build_result_set;
use crate::error::ContactsDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run a SELECT and collect every row.
///
/// # Errors
/// Returns `ContactsDbError` if the statement fails or a value cannot be decoded.
pub async fn execute_select(
    conn: &mut MySqlConnection,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, ContactsDbError> {
    let rows = bind_params(sqlx::query(query), params)
        .fetch_all(&mut *conn)
        .await?;
    build_result_set(&rows)
}

/// Run one data-modifying statement in its own transaction and commit it.
///
/// Returns the number of rows changed. Dropping the uncommitted transaction on error
/// rolls it back before the connection returns to the pool.
///
/// # Errors
/// Returns `ContactsDbError` if the statement or the commit fails.
pub async fn execute_dml(
    conn: &mut MySqlConnection,
    query: &str,
    params: &[RowValues],
) -> Result<usize, ContactsDbError> {
    let mut tx = conn.begin().await?;
    let result = bind_params(sqlx::query(query), params)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    usize::try_from(result.rows_affected()).map_err(|e| {
        ContactsDbError::ExecutionError(format!("rows affected out of range: {e}"))
    })
}

/// Run statements without parameters (DDL) over the text protocol.
///
/// # Errors
/// Returns `ContactsDbError` if any statement fails.
pub async fn execute_batch(conn: &mut MySqlConnection, ddl: &str) -> Result<(), ContactsDbError> {
    sqlx::raw_sql(ddl).execute(&mut *conn).await?;
    Ok(())
}
