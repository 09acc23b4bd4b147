use std::path::PathBuf;

use clap::{Parser, Subcommand};
use contacts_db::DatabaseType;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage accounts and contacts in a contacts database")]
pub(crate) struct Args {
    /// Backend to use; defaults to `DB_BACKEND` from the environment.
    #[arg(long, value_enum)]
    pub(crate) backend: Option<DatabaseType>,
    /// `SQLite` database file; implies `--backend sqlite`.
    #[arg(long)]
    pub(crate) sqlite_path: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long)]
    pub(crate) json: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Report whether the database is reachable and how full the pool is.
    Check,
    /// Create the login and contact tables if they are missing.
    InitSchema,
    Signup {
        name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    /// Add a contact to an account.
    Add {
        owner_id: String,
        name: String,
        number: i64,
    },
    List {
        owner_id: String,
    },
    Show {
        contact_id: String,
    },
    Update {
        contact_id: String,
        name: String,
        number: i64,
    },
    Delete {
        contact_id: String,
    },
}

impl Args {
    /// Environment overrides implied by the command-line flags.
    pub(crate) fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(path) = &self.sqlite_path {
            out.push(("DB_BACKEND", "sqlite".to_string()));
            out.push(("SQLITE_PATH", path.display().to_string()));
        } else if let Some(backend) = self.backend {
            out.push(("DB_BACKEND", backend.to_string()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_path_implies_sqlite_backend() {
        let args = Args::parse_from(["contacts-cli", "--sqlite-path", "/tmp/c.db", "list", "u1"]);
        let overrides = args.overrides();
        assert!(overrides.contains(&("DB_BACKEND", "sqlite".to_string())));
        assert!(overrides.contains(&("SQLITE_PATH", "/tmp/c.db".to_string())));
        assert!(matches!(args.command, Command::List { ref owner_id } if owner_id == "u1"));
    }

    #[test]
    fn add_parses_number() {
        let args = Args::parse_from(["contacts-cli", "--json", "add", "u1", "Alice", "5551234"]);
        assert!(args.json);
        assert!(matches!(args.command, Command::Add { number: 5_551_234, .. }));
    }
}
