use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::Serialize;

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used by every backend so statement helpers never branch on
/// driver types:
/// ```rust
/// use contacts_db::prelude::*;
///
/// let params = vec![
///     RowValues::Text("c1".into()),
///     RowValues::Int(5_551_234),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

/// The database engines a pool can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `MySQL` / `MariaDB` database
    #[cfg(feature = "mysql")]
    #[value(name = "mysql")]
    MySql,
    /// `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            DatabaseType::MySql => write!(f, "mysql"),
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => write!(f, "sqlite"),
        }
    }
}
