use std::fmt::Display;

use contacts_db::ids::new_token;
use contacts_db::{ContactsDb, DataAccessError};
use serde::Serialize;

use crate::args::Command;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// The command was understood but declined, e.g. bad credentials.
    #[error("{0}")]
    Refused(String),
    #[error(transparent)]
    Data(#[from] DataAccessError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn refuse<T>(reason: impl Into<String>) -> Result<T, CliError> {
    Err(CliError::Refused(reason.into()))
}

/// Prints `value` as JSON, or `text` otherwise.
fn emit<T: Serialize>(json: bool, value: &T, text: impl Display) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

#[derive(Serialize)]
struct Created<'a> {
    id: &'a str,
}

pub(crate) async fn run(db: &ContactsDb, command: Command, json: bool) -> Result<(), CliError> {
    match command {
        Command::Check => {
            let status = db.status();
            let text = match status.backend {
                Some(backend) => format!(
                    "connected to {backend}: {} connections, {} idle",
                    status.connections, status.idle_connections
                ),
                None => "disconnected".to_string(),
            };
            emit(json, &status, text)?;
            if status.connected {
                Ok(())
            } else {
                refuse("database unavailable")
            }
        }
        Command::InitSchema => {
            if !db.is_connected() {
                return refuse("database unavailable");
            }
            db.ensure_schema().await?;
            emit(json, &serde_json::json!({ "schema": "ok" }), "schema ready")
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            if email.trim().is_empty() || password.is_empty() {
                return refuse("email and password are required");
            }
            if db.email_exists(&email).await? {
                return refuse(format!("an account for {email} already exists"));
            }
            let id = new_token();
            if !db.signup(&id, &name, &email, &password).await? {
                return refuse("signup was not accepted");
            }
            emit(json, &Created { id: &id }, format!("created account {id}"))
        }
        Command::Login { email, password } => match db.login(&email, &password).await? {
            Some(user) => {
                let text = format!("{} <{}> id={}", user.name, user.email, user.id);
                emit(json, &user, text)
            }
            None => refuse("invalid email or password"),
        },
        Command::Add {
            owner_id,
            name,
            number,
        } => {
            if name.trim().is_empty() || number == 0 {
                return refuse("a contact needs a name and a number");
            }
            let id = new_token();
            db.save_contact(&id, &name, number, &owner_id).await?;
            emit(json, &Created { id: &id }, format!("added contact {id}"))
        }
        Command::List { owner_id } => {
            let contacts = db.list_contacts(&owner_id).await?;
            let text = contacts
                .iter()
                .map(|c| format!("{}\t{}\t{}", c.id, c.name, c.number))
                .collect::<Vec<_>>()
                .join("\n");
            emit(json, &contacts, text)
        }
        Command::Show { contact_id } => match db.get_contact(&contact_id).await? {
            Some(contact) => {
                let text = format!("{}\t{}", contact.name, contact.number);
                emit(json, &contact, text)
            }
            None => refuse(format!("no contact {contact_id}")),
        },
        Command::Update {
            contact_id,
            name,
            number,
        } => {
            db.update_contact(&contact_id, &name, number).await?;
            emit(
                json,
                &Created { id: &contact_id },
                format!("updated contact {contact_id}"),
            )
        }
        Command::Delete { contact_id } => {
            db.delete_contact(&contact_id).await?;
            emit(
                json,
                &Created { id: &contact_id },
                format!("deleted contact {contact_id}"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnected_reads_are_empty() {
        let db = ContactsDb::disconnected();
        let listed = run(&db, Command::List { owner_id: "u1".into() }, true).await;
        assert!(listed.is_ok());

        let shown = run(&db, Command::Show { contact_id: "c1".into() }, false).await;
        assert!(matches!(shown, Err(CliError::Refused(_))));
    }

    #[tokio::test]
    async fn add_requires_name_and_number() {
        let db = ContactsDb::disconnected();
        let cmd = Command::Add {
            owner_id: "u1".into(),
            name: " ".into(),
            number: 5_551_234,
        };
        assert!(matches!(run(&db, cmd, false).await, Err(CliError::Refused(_))));
        let cmd = Command::Add {
            owner_id: "u1".into(),
            name: "Alice".into(),
            number: 0,
        };
        assert!(matches!(run(&db, cmd, false).await, Err(CliError::Refused(_))));
    }

    #[tokio::test]
    async fn signup_requires_email_and_password() {
        let db = ContactsDb::disconnected();
        let cmd = Command::Signup {
            name: "Ada".into(),
            email: String::new(),
            password: "pw".into(),
        };
        assert!(matches!(run(&db, cmd, false).await, Err(CliError::Refused(_))));
    }
}
