// SQLite module - provides SQLite-specific database functionality
//
// This module is split into several sub-modules:
// - config: bb8 connection manager and pool setup
// - params: Parameter conversion between middleware and SQLite types
// - query: Result extraction and building
// - executor: Database operation execution

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

// Re-export the public API
pub use config::{SharedSqliteConnection, SqliteManager, SqliteOptions, SqliteOptionsBuilder};
pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::Params;
pub use query::build_result_set;
