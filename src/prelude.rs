//! Convenient imports for common functionality.
//!
//! ```rust
//! use contacts_db::prelude::*;
//! ```

pub use crate::config::{AppConfig, DatabaseConfig};
pub use crate::db::{ContactsDb, PoolStatus};
pub use crate::error::{ContactsDbError, DataAccessError, ErrorKind, Operation};
pub use crate::ids::new_token;
pub use crate::models::{ContactDetails, ContactSummary, UserRecord};
pub use crate::pool::{ConfigAndPool, MiddlewarePool, MiddlewarePoolConnection, PoolOptions, PoolState};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "mysql")]
pub use crate::mysql::{MySqlOptions, MySqlOptionsBuilder};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
