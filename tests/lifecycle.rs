mod common;

use std::time::Duration;

use contacts_db::prelude::*;

async fn assert_inert(db: &ContactsDb) -> Result<(), Box<dyn std::error::Error>> {
    assert!(!db.is_connected());
    assert_eq!(db.login("ada@example.com", "pw").await?, None);
    assert!(!db.email_exists("ada@example.com").await?);
    assert!(!db.signup("u1", "Ada", "ada@example.com", "pw").await?);
    db.save_contact("c1", "Alice", 5_551_234, "u1").await?;
    assert!(db.list_contacts("u1").await?.is_empty());
    assert_eq!(db.get_contact("c1").await?, None);
    db.update_contact("c1", "Alicia", 1).await?;
    db.delete_contact("c1").await?;
    db.ensure_schema().await?;
    Ok(())
}

#[tokio::test]
async fn disconnected_layer_returns_empty_values() -> Result<(), Box<dyn std::error::Error>> {
    let db = ContactsDb::disconnected();
    assert_inert(&db).await?;
    assert_eq!(
        db.status(),
        PoolStatus {
            connected: false,
            backend: None,
            connections: 0,
            idle_connections: 0,
        }
    );
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn unopenable_sqlite_path_starts_disconnected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    let opts = SqliteOptions::new(dir.path().join("missing").join("contacts.db"))
        .with_pool_options(PoolOptions {
            pool_timeout: Duration::from_millis(500),
            ..common::small_pool()
        });

    let db = ContactsDb::connect(opts).await;
    assert_inert(&db).await
}

#[cfg(feature = "mysql")]
#[tokio::test]
async fn unreachable_mysql_starts_disconnected() -> Result<(), Box<dyn std::error::Error>> {
    let opts = MySqlOptionsBuilder::new("127.0.0.1", "contacts", "app", "pw")
        .port(1)
        .pool_options(PoolOptions {
            pool_timeout: Duration::from_secs(1),
            ..common::small_pool()
        })
        .finish();

    let started = std::time::Instant::now();
    let db = ContactsDb::connect(opts).await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_inert(&db).await
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn connect_warms_up_the_pool() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    let opts = SqliteOptions::new(dir.path().join("contacts.db")).with_pool_options(common::small_pool());
    let db = ContactsDb::connect(opts).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let status = db.status();
    assert!(status.connected);
    assert_eq!(status.backend, Some(DatabaseType::Sqlite));
    assert_eq!(status.connections, common::small_pool().pool_size);
    assert_eq!(status.idle_connections, common::small_pool().pool_size);

    let defaults = ContactsDb::connect(SqliteOptions::new(dir.path().join("defaults.db"))).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(defaults.status().connections, PoolOptions::default().pool_size);
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn exhausted_pool_times_out_with_connection_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    let pool = PoolOptions {
        pool_size: 1,
        max_overflow: 1,
        pool_timeout: Duration::from_millis(700),
        ..PoolOptions::default()
    };
    let cap = ConfigAndPool::sqlite_builder(dir.path().join("contacts.db"))
        .pool_options(pool)
        .build()
        .await?;
    let db = ContactsDb::from_pool(cap.clone());
    db.ensure_schema().await?;

    let held = vec![cap.get_connection().await?, cap.get_connection().await?];

    let started = std::time::Instant::now();
    let err = db.list_contacts("u1").await.unwrap_err();
    let waited = started.elapsed();
    assert_eq!(err.operation, Operation::ListContacts);
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(waited >= Duration::from_millis(600), "gave up after {waited:?}");
    assert!(waited < Duration::from_secs(5), "waited {waited:?}");

    drop(held);
    assert!(db.list_contacts("u1").await?.is_empty());
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn close_is_idempotent_and_disconnects() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    let db = common::open_db(dir.path()).await?;
    assert!(db.signup("u1", "Ada", "ada@example.com", "pw").await?);

    db.close();
    db.close();

    assert!(!db.status().connected);
    assert_inert(&db).await?;

    let reopened = common::open_db(dir.path()).await?;
    assert!(reopened.email_exists("ada@example.com").await?);
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn builder_pool_can_be_wrapped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    let cap = ConfigAndPool::sqlite_builder(dir.path().join("contacts.db"))
        .pool_options(common::small_pool())
        .build()
        .await?;
    let db = ContactsDb::from_pool(cap);

    db.ensure_schema().await?;
    db.ensure_schema().await?;
    assert!(db.signup("u1", "Ada", "ada@example.com", "pw").await?);
    assert!(db.email_exists("ada@example.com").await?);
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn query_errors_carry_the_operation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    // No schema: every statement hits a missing table.
    let opts = SqliteOptions::new(dir.path().join("empty.db")).with_pool_options(common::small_pool());
    let db = ContactsDb::connect(opts).await;
    assert!(db.is_connected());

    let err = db.list_contacts("u1").await.unwrap_err();
    assert_eq!(err.operation, Operation::ListContacts);
    assert_eq!(err.kind(), ErrorKind::Query);
    assert!(err.to_string().starts_with("list_contacts failed"));

    let err = db.signup("u1", "Ada", "ada@example.com", "pw").await.unwrap_err();
    assert_eq!(err.operation, Operation::Signup);
    Ok(())
}
