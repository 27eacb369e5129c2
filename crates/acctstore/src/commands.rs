//! One-shot CLI commands. Each opens the store, applies at most one
//! mutation, makes sure the snapshot reached storage, and prints JSON or
//! an id to stdout.

use eyre::{eyre, WrapErr};

use acctstore_core::{AccountField, AccountStore};

use crate::cli::Command;

pub fn run(mut store: AccountStore, command: Command) -> eyre::Result<()> {
    match command {
        Command::List { raw } => {
            let json = if raw {
                serde_json::to_string_pretty(store.records())
            } else {
                serde_json::to_string_pretty(&store.accounts())
            }
            .context("encode accounts")?;
            println!("{json}");
        }
        Command::Add => {
            let record = store.add_account();
            store.sync().context("persist new account")?;
            println!("{}", record.id);
        }
        Command::Set { id, field, value } => {
            let field: AccountField = field.parse().context("parse field name")?;
            if !store.update_field(&id, field, value) {
                return Err(eyre!("account not found: {id}"));
            }
            store.sync().context("persist account change")?;
            if let Some(record) = store.record(&id) {
                if !record.kind.is_recognized() {
                    tracing::warn!(
                        id = %id,
                        kind = %record.kind,
                        "stored an unrecognized account kind"
                    );
                }
            }
        }
        Command::Remove { id } => {
            if !store.remove_account(&id) {
                return Err(eyre!("account not found: {id}"));
            }
            store.sync().context("persist account removal")?;
        }
        Command::Export => {
            let json = store.export_json().context("export accounts")?;
            println!("{json}");
        }
        Command::Serve(_) => {
            return Err(eyre!("`serve` is handled by the server entry point"));
        }
    }
    Ok(())
}
