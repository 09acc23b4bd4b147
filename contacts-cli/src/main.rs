mod args;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use contacts_db::{AppConfig, ContactsDb};

use crate::args::Args;
use crate::commands::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init();
    dotenvy::dotenv().ok();

    let overrides = args.overrides();
    let config = match AppConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| std::env::var(key).ok())
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::from(2);
        }
    };

    let db = match config.database {
        Some(database) => ContactsDb::connect(database).await,
        None => {
            tracing::warn!("no database configured, running disconnected");
            ContactsDb::disconnected()
        }
    };

    let result = commands::run(&db, args.command, args.json).await;
    db.close();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Refused(reason)) => {
            eprintln!("{reason}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
