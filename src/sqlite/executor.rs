use std::sync::Arc;

use rusqlite::params_from_iter;

use super::config::{SharedSqliteConnection, run_blocking};
use super::params::Params;
use super::query::build_result_set;
use crate::error::ContactsDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run a SELECT and collect every row.
///
/// # Errors
/// Returns `ContactsDbError` if preparing or running the statement fails.
pub async fn execute_select(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, ContactsDbError> {
    let query = query.to_owned();
    let values = Params::convert(params);
    run_blocking(Arc::clone(conn), move |conn| {
        let mut stmt = conn.prepare(&query)?;
        build_result_set(&mut stmt, values.as_values())
    })
    .await
}

/// Run one data-modifying statement in its own transaction and commit it.
///
/// Returns the number of rows changed. The transaction rolls back if the statement fails.
///
/// # Errors
/// Returns `ContactsDbError` if the statement or the commit fails.
pub async fn execute_dml(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<usize, ContactsDbError> {
    let query = query.to_owned();
    let values = Params::convert(params);
    run_blocking(Arc::clone(conn), move |conn| {
        let tx = conn.transaction()?;
        let rows = tx.execute(&query, params_from_iter(values.as_values()))?;
        tx.commit()?;
        Ok(rows)
    })
    .await
}

/// Run a batch of statements without parameters (DDL).
///
/// # Errors
/// Returns `ContactsDbError` if any statement fails.
pub async fn execute_batch(conn: &SharedSqliteConnection, ddl: &str) -> Result<(), ContactsDbError> {
    let ddl = ddl.to_owned();
    run_blocking(Arc::clone(conn), move |conn| {
        conn.execute_batch(&ddl).map_err(ContactsDbError::SqliteError)
    })
    .await
}
