//! Pooled async data access for a contacts address book.
//!
//! [`ContactsDb`] wraps a bb8 pool over `MySQL` (sqlx) or `SQLite` (rusqlite) and
//! exposes one method per operation: login lookup, email check, signup, and
//! contact save/list/get/update/delete. Statements are always parameterized.
//!
//! ```rust,no_run
//! use contacts_db::prelude::*;
//!
//! # async fn run() -> Result<(), DataAccessError> {
//! let db = ContactsDb::connect(SqliteOptions::new("contacts.db")).await;
//! db.ensure_schema().await?;
//! if db.signup("u1", "Ada", "ada@example.com", "pw").await? {
//!     db.save_contact("c1", "Alice", 5_551_234, "u1").await?;
//! }
//! let contacts = db.list_contacts("u1").await?;
//! # let _ = contacts;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod ids;
pub mod models;
pub mod password;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod schema;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{AppConfig, DatabaseConfig};
pub use db::{ContactsDb, PoolStatus};
pub use error::{ContactsDbError, DataAccessError, ErrorKind, Operation};
pub use models::{ContactDetails, ContactSummary, UserRecord};
pub use pool::{ConfigAndPool, MiddlewarePool, MiddlewarePoolConnection, PoolOptions, PoolState};
pub use results::{CustomDbRow, ResultSet};
pub use types::{DatabaseType, RowValues};
