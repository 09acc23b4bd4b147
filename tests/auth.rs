#![cfg(feature = "sqlite")]

mod common;

use contacts_db::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn signup_then_login_returns_the_account() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;

    assert!(db.signup("u1", "Ada", "ada@example.com", "hunter2").await?);

    let user = db.login("ada@example.com", "hunter2").await?;
    assert_eq!(
        user,
        Some(UserRecord {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        })
    );
    Ok(())
}

#[tokio::test]
async fn login_requires_both_email_and_password() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;
    assert!(db.signup("u1", "Ada", "ada@example.com", "hunter2").await?);

    assert_eq!(db.login("ada@example.com", "wrong").await?, None);
    assert_eq!(db.login("nobody@example.com", "hunter2").await?, None);
    Ok(())
}

#[tokio::test]
async fn passwords_are_not_stored_in_clear() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;
    assert!(db.signup("u1", "Ada", "ada@example.com", "hunter2").await?);

    let conn = rusqlite::Connection::open(dir.path().join("contacts.db"))?;
    let stored: String =
        conn.query_row("SELECT lpassword FROM login WHERE lid = 'u1'", [], |row| row.get(0))?;
    assert_ne!(stored, "hunter2");
    assert!(stored.starts_with("$argon2id$"));
    Ok(())
}

#[tokio::test]
async fn plain_text_legacy_row_never_matches() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;

    let conn = rusqlite::Connection::open(dir.path().join("contacts.db"))?;
    conn.execute(
        "INSERT INTO login (lid, lname, lemail, lpassword) VALUES ('u0', 'Old', 'old@example.com', 'pw')",
        [],
    )?;
    drop(conn);

    assert!(db.email_exists("old@example.com").await?);
    assert_eq!(db.login("old@example.com", "pw").await?, None);
    Ok(())
}

#[tokio::test]
async fn email_exists_tracks_signups() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;

    assert!(!db.email_exists("ada@example.com").await?);
    assert!(db.signup("u1", "Ada", "ada@example.com", "hunter2").await?);
    assert!(db.email_exists("ada@example.com").await?);
    assert!(!db.email_exists("bob@example.com").await?);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_refused_and_first_account_kept() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;

    assert!(db.signup("u1", "Ada", "ada@example.com", "first").await?);
    assert!(!db.signup("u2", "Imposter", "ada@example.com", "second").await?);

    let user = db.login("ada@example.com", "first").await?;
    assert_eq!(user.map(|u| u.id), Some("u1".to_string()));
    assert_eq!(db.login("ada@example.com", "second").await?, None);
    Ok(())
}

#[tokio::test]
async fn duplicate_id_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = common::open_db(dir.path()).await?;

    assert!(db.signup("u1", "Ada", "ada@example.com", "pw").await?);
    assert!(!db.signup("u1", "Bob", "bob@example.com", "pw").await?);
    assert!(!db.email_exists("bob@example.com").await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_unknown_email_logins_all_miss() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = std::sync::Arc::new(common::open_db(dir.path()).await?);

    let mut handles = Vec::new();
    for i in 0..4 {
        let db = std::sync::Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            db.login(&format!("nobody{i}@example.com"), "pw").await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await??, None);
    }
    Ok(())
}
