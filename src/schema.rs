//! Table definitions for the `login` and `contact` tables.
//!
//! Production databases are provisioned separately; these statements are idempotent
//! and mainly serve local development and tests.

use crate::types::DatabaseType;

#[cfg(feature = "mysql")]
const MYSQL_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS login (
        lid VARCHAR(64) NOT NULL PRIMARY KEY,
        lname VARCHAR(255) NOT NULL,
        lemail VARCHAR(255) NOT NULL UNIQUE,
        lpassword VARCHAR(255) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS contact (
        cid VARCHAR(64) NOT NULL PRIMARY KEY,
        cname VARCHAR(255) NOT NULL,
        cnumber BIGINT NOT NULL,
        lid VARCHAR(64) NOT NULL,
        date DATE NOT NULL,
        INDEX contact_owner_idx (lid),
        CONSTRAINT contact_owner_fk FOREIGN KEY (lid) REFERENCES login (lid)
    )",
];

#[cfg(feature = "sqlite")]
const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS login (
        lid TEXT NOT NULL PRIMARY KEY,
        lname TEXT NOT NULL,
        lemail TEXT NOT NULL UNIQUE,
        lpassword TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS contact (
        cid TEXT NOT NULL PRIMARY KEY,
        cname TEXT NOT NULL,
        cnumber INTEGER NOT NULL,
        lid TEXT NOT NULL REFERENCES login (lid),
        date TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS contact_owner_idx ON contact (lid)",
];

/// The DDL statements for `db_type`, in the order they must run.
#[must_use]
pub fn statements(db_type: DatabaseType) -> &'static [&'static str] {
    match db_type {
        #[cfg(feature = "mysql")]
        DatabaseType::MySql => MYSQL_SCHEMA,
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => SQLITE_SCHEMA,
    }
}
