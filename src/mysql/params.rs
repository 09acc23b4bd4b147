use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;

use crate::types::RowValues;

pub type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Bind each value onto the query's `?` placeholders, in order.
#[must_use]
pub fn bind_params<'q>(mut query: MySqlQuery<'q>, params: &[RowValues]) -> MySqlQuery<'q> {
    for param in params {
        query = match param {
            RowValues::Int(i) => query.bind(*i),
            RowValues::Float(f) => query.bind(*f),
            RowValues::Text(s) => query.bind(s.clone()),
            RowValues::Bool(b) => query.bind(*b),
            RowValues::Date(d) => query.bind(*d),
            RowValues::Timestamp(dt) => query.bind(*dt),
            RowValues::Null => query.bind(None::<String>),
            RowValues::Blob(bytes) => query.bind(bytes.clone()),
        };
    }
    query
}
