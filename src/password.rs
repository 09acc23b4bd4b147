//! Argon2id password hashing.
//!
//! Stored credentials are PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$...`) produced
//! with a fresh random salt; verification goes through `argon2`'s constant-time
//! comparison.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ContactsDbError;

/// Hash a password using Argon2id. Returns a PHC-format string.
///
/// # Errors
/// Returns `ContactsDbError::PasswordError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ContactsDbError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ContactsDbError::PasswordError(format!("failed to hash password: {e}")))
}

/// Verify a password against a PHC-format hash string.
///
/// # Errors
/// Returns `ContactsDbError::PasswordError` if the stored hash is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ContactsDbError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ContactsDbError::PasswordError(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking thread pool; Argon2 is deliberately slow.
pub(crate) async fn hash_password_blocking(password: String) -> Result<String, ContactsDbError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ContactsDbError::PasswordError(format!("hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking thread pool.
pub(crate) async fn verify_password_blocking(
    password: String,
    hash: String,
) -> Result<bool, ContactsDbError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ContactsDbError::PasswordError(format!("verification task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn plain_text_stored_value_is_rejected() {
        let err = verify_password("secret", "secret").unwrap_err();
        assert!(matches!(err, ContactsDbError::PasswordError(_)));
    }
}
