use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// acctstore — account records for the form editor, persisted between runs.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Directory holding the persisted account snapshot.
    #[arg(
        long,
        default_value = "acctstore-data",
        env = "ACCTSTORE_DATA_DIR",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Keep accounts in memory only; nothing survives the process.
    #[arg(long, global = true)]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the local JSON API the editor talks to.
    Serve(ServeArgs),

    /// Print all accounts as JSON.
    List {
        /// Print stored records (labels as one string) instead of the view.
        #[arg(long)]
        raw: bool,
    },

    /// Append a blank account and print its id.
    Add,

    /// Replace one field of an account.
    Set {
        id: String,
        /// One of `labelsRaw`, `kind`, `login`, `password`.
        field: String,
        value: String,
    },

    /// Remove an account.
    Remove { id: String },

    /// Print the persisted snapshot.
    Export,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "3090")]
    pub port: u16,

    /// Token clients must send in `X-API-Token`. Random when omitted.
    #[arg(long, env = "ACCTSTORE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}
