use tokio::sync::OnceCell;

use super::{ContactsDb, fail, text_column};
use crate::error::{DataAccessError, Operation};
use crate::models::UserRecord;
use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::types::RowValues;

const SELECT_LOGIN_BY_EMAIL: &str =
    "SELECT lid, lname, lemail, lpassword FROM login WHERE lemail = ?";
const SELECT_LID_BY_EMAIL: &str = "SELECT lid FROM login WHERE lemail = ?";
const INSERT_LOGIN: &str =
    "INSERT INTO login (lid, lname, lemail, lpassword) VALUES (?, ?, ?, ?)";

// Verified against when the email is unknown or the stored value is not a hash, so
// every miss costs one Argon2 run.
static DUMMY_HASH: OnceCell<Option<String>> = OnceCell::const_new();

async fn dummy_hash() -> Option<String> {
    DUMMY_HASH
        .get_or_init(|| async {
            hash_password_blocking("contacts-db timing filler".to_owned())
                .await
                .ok()
        })
        .await
        .clone()
}

/// Burn one verification against the dummy hash. The result is always a mismatch.
async fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = dummy_hash().await {
        let _ = verify_password_blocking(password.to_owned(), hash).await;
    }
    false
}

impl ContactsDb {
    /// Look up the account with exactly this email and password.
    ///
    /// Returns `None` for an unknown email and for a wrong password alike, taking
    /// the same amount of hashing work in both cases.
    ///
    /// # Errors
    /// Returns `DataAccessError` if the query fails.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, DataAccessError> {
        let op = Operation::Login;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(None);
        };
        let rs = conn
            .execute_select(SELECT_LOGIN_BY_EMAIL, &[RowValues::from(email)])
            .await
            .map_err(fail(op))?;
        drop(conn);

        let candidate = match rs.first() {
            Some(row) => {
                let user = UserRecord {
                    id: text_column(row, "lid").map_err(fail(op))?,
                    name: text_column(row, "lname").map_err(fail(op))?,
                    email: text_column(row, "lemail").map_err(fail(op))?,
                };
                let stored = text_column(row, "lpassword").map_err(fail(op))?;
                Some((user, stored))
            }
            None => None,
        };

        let verified = match &candidate {
            Some((_, stored)) => {
                match verify_password_blocking(password.to_owned(), stored.clone()).await {
                    Ok(matches) => matches,
                    Err(err) => {
                        // Rows written before hashing was introduced hold plain text.
                        tracing::warn!(error = %err, "stored credential is not an argon2 hash");
                        verify_dummy(password).await
                    }
                }
            }
            None => verify_dummy(password).await,
        };

        Ok(candidate.and_then(|(user, _)| verified.then_some(user)))
    }

    /// True iff an account with this email exists, whatever its password.
    ///
    /// # Errors
    /// Returns `DataAccessError` if the query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DataAccessError> {
        let op = Operation::EmailExists;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(false);
        };
        let rs = conn
            .execute_select(SELECT_LID_BY_EMAIL, &[RowValues::from(email)])
            .await
            .map_err(fail(op))?;
        Ok(!rs.is_empty())
    }

    /// Create an account. The password is stored as an Argon2id hash.
    ///
    /// Returns `false` without changing anything when the email (or id) is already
    /// taken, or when the layer is disconnected.
    ///
    /// # Errors
    /// Returns `DataAccessError` for failures other than a constraint violation.
    pub async fn signup(
        &self,
        id: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, DataAccessError> {
        let op = Operation::Signup;
        if !self.is_connected() {
            return Ok(false);
        }
        let hash = hash_password_blocking(password.to_owned())
            .await
            .map_err(fail(op))?;

        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(false);
        };
        let params = [
            RowValues::from(id),
            RowValues::from(name),
            RowValues::from(email),
            RowValues::Text(hash),
        ];
        match conn.execute_dml(INSERT_LOGIN, &params).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_constraint_violation() => {
                tracing::debug!(error = %err, "signup rejected by a constraint");
                Ok(false)
            }
            Err(err) => Err(fail(op)(err)),
        }
    }
}
