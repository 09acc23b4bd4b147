use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactsDbError {
    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MySqlError(#[from] sqlx::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    PoolErrorMySql(#[from] bb8::RunError<sqlx::Error>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Password hashing error: {0}")]
    PasswordError(String),
}

/// Coarse classification of a failure, independent of the backend that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The database cannot be reached or the pool gave up waiting for a connection.
    Connection,
    /// A uniqueness, foreign-key, or not-null rule rejected a write.
    ConstraintViolation,
    /// A malformed statement, binding, or decode. Indicates a bug, not a transient condition.
    Query,
}

impl ContactsDbError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "mysql")]
            ContactsDbError::MySqlError(err) => mysql_error_kind(err),
            #[cfg(feature = "sqlite")]
            ContactsDbError::SqliteError(err) => sqlite_error_kind(err),
            #[cfg(feature = "mysql")]
            ContactsDbError::PoolErrorMySql(_) => ErrorKind::Connection,
            ContactsDbError::ConfigError(_) | ContactsDbError::ConnectionError(_) => {
                ErrorKind::Connection
            }
            ContactsDbError::ExecutionError(_)
            | ContactsDbError::PasswordError(_) => ErrorKind::Query,
        }
    }

    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        self.kind() == ErrorKind::ConstraintViolation
    }
}

#[cfg(feature = "mysql")]
fn mysql_error_kind(err: &sqlx::Error) -> ErrorKind {
    use sqlx::error::ErrorKind as SqlxKind;

    match err {
        sqlx::Error::Database(db) => match db.kind() {
            SqlxKind::UniqueViolation
            | SqlxKind::ForeignKeyViolation
            | SqlxKind::NotNullViolation
            | SqlxKind::CheckViolation => ErrorKind::ConstraintViolation,
            _ => ErrorKind::Query,
        },
        sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorKind::Connection,
        _ => ErrorKind::Query,
    }
}

#[cfg(feature = "sqlite")]
fn sqlite_error_kind(err: &rusqlite::Error) -> ErrorKind {
    use rusqlite::ErrorCode;

    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => ErrorKind::ConstraintViolation,
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::PermissionDenied
            | ErrorCode::SystemIoFailure => ErrorKind::Connection,
            _ => ErrorKind::Query,
        },
        rusqlite::Error::InvalidPath(_) => ErrorKind::Connection,
        _ => ErrorKind::Query,
    }
}

/// `SQLite` pools surface their manager errors wrapped in `bb8::RunError`.
impl From<bb8::RunError<ContactsDbError>> for ContactsDbError {
    fn from(err: bb8::RunError<ContactsDbError>) -> Self {
        match err {
            bb8::RunError::User(inner) => inner,
            bb8::RunError::TimedOut => ContactsDbError::ConnectionError(
                "timed out waiting for a pooled connection".to_string(),
            ),
        }
    }
}

/// The data-access operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    EnsureSchema,
    Login,
    EmailExists,
    Signup,
    SaveContact,
    ListContacts,
    GetContact,
    UpdateContact,
    DeleteContact,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::EnsureSchema => "ensure_schema",
            Operation::Login => "login",
            Operation::EmailExists => "email_exists",
            Operation::Signup => "signup",
            Operation::SaveContact => "save_contact",
            Operation::ListContacts => "list_contacts",
            Operation::GetContact => "get_contact",
            Operation::UpdateContact => "update_contact",
            Operation::DeleteContact => "delete_contact",
        };
        f.write_str(name)
    }
}

/// Failure of one `ContactsDb` operation.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct DataAccessError {
    pub operation: Operation,
    #[source]
    pub source: ContactsDbError,
}

impl DataAccessError {
    #[must_use]
    pub fn new(operation: Operation, source: ContactsDbError) -> Self {
        Self { operation, source }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_a_connection_error() {
        let err: ContactsDbError = bb8::RunError::<ContactsDbError>::TimedOut.into();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn run_error_unwraps_manager_error() {
        let err: ContactsDbError =
            bb8::RunError::User(ContactsDbError::ExecutionError("boom".into())).into();
        assert!(matches!(err, ContactsDbError::ExecutionError(ref m) if m == "boom"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_unique_failure_is_a_constraint_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        assert!(ContactsDbError::from(err).is_constraint_violation());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_syntax_error_is_a_query_error() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("SELEC 1", []).unwrap_err();
        assert_eq!(ContactsDbError::from(err).kind(), ErrorKind::Query);
    }

    #[test]
    fn data_access_error_names_the_operation() {
        let err = DataAccessError::new(
            Operation::SaveContact,
            ContactsDbError::ExecutionError("no such table: contact".into()),
        );
        assert_eq!(
            err.to_string(),
            "save_contact failed: SQL execution error: no such table: contact"
        );
        assert_eq!(err.kind(), ErrorKind::Query);
    }
}
