// MySQL module - provides MySQL-specific database functionality
//
// - config: bb8 connection manager, TLS and pool setup
// - params: binding middleware values onto sqlx queries
// - query: decoding sqlx rows into result sets
// - executor: Database operation execution

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{MySqlManager, MySqlOptions, MySqlOptionsBuilder};
pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::bind_params;
pub use query::build_result_set;
