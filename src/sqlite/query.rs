use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Row, Statement, params_from_iter};

use crate::error::ContactsDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

impl From<Value> for RowValues {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RowValues::Null,
            Value::Integer(i) => RowValues::Int(i),
            Value::Text(s) => RowValues::Text(s),
            // Not produced by the contacts tables; kept for arbitrary SELECTs.
            Value::Real(f) => RowValues::Float(f),
            Value::Blob(b) => RowValues::Blob(b),
        }
    }
}

fn row_values(row: &Row<'_>, width: usize) -> rusqlite::Result<Vec<RowValues>> {
    (0..width)
        .map(|idx| row.get::<_, Value>(idx).map(RowValues::from))
        .collect()
}

/// Run a prepared statement and collect its rows under the statement's column names.
///
/// # Errors
/// Returns `ContactsDbError` if the query fails or a column cannot be read.
pub fn build_result_set(
    stmt: &mut Statement,
    params: &[Value],
) -> Result<ResultSet, ContactsDbError> {
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let width = columns.len();

    let mut result_set = ResultSet::default();
    result_set.set_column_names(Arc::new(columns));
    for row in stmt.query_map(params_from_iter(params), |row| row_values(row, width))? {
        result_set.add_row_values(row?);
    }
    Ok(result_set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_rows_with_named_columns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE contact (cid TEXT, cnumber INTEGER);
             INSERT INTO contact VALUES ('c1', 5551234), ('c2', NULL);",
        )
        .unwrap();
        let mut stmt = conn
            .prepare("SELECT cid, cnumber FROM contact WHERE cid = ?")
            .unwrap();

        let rs = build_result_set(&mut stmt, &[Value::Text("c1".into())]).unwrap();
        assert_eq!(rs.rows_affected, 1);
        assert_eq!(rs.results[0].get("cnumber"), Some(&RowValues::Int(5_551_234)));

        let rs = build_result_set(&mut stmt, &[Value::Text("c2".into())]).unwrap();
        assert!(rs.results[0].get("cnumber").is_some_and(RowValues::is_null));
    }
}
