#![allow(dead_code)]

use std::time::Duration;

use contacts_db::prelude::*;

/// A pool small enough for tests and quick to give up on a bad path.
pub fn small_pool() -> PoolOptions {
    PoolOptions {
        pool_size: 2,
        max_overflow: 2,
        pool_timeout: Duration::from_secs(2),
        ..PoolOptions::default()
    }
}

/// A connected layer over a fresh `SQLite` file in `dir`, with the schema in place.
#[cfg(feature = "sqlite")]
pub async fn open_db(dir: &std::path::Path) -> Result<ContactsDb, Box<dyn std::error::Error>> {
    let opts = SqliteOptions::new(dir.join("contacts.db")).with_pool_options(small_pool());
    let db = ContactsDb::connect(opts).await;
    assert!(db.is_connected(), "sqlite pool should open in a temp dir");
    db.ensure_schema().await?;
    Ok(db)
}
