mod cli;
mod commands;
mod server;

use std::sync::Arc;

use axum::http::HeaderValue;
use clap::Parser;
use eyre::WrapErr;

use acctstore_core::{AccountStore, FileStorage, KeyValueStorage, MemoryStorage};

use cli::{Command, ServeArgs};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so command output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let storage: Box<dyn KeyValueStorage> = if args.in_memory {
        tracing::warn!("running with in-memory storage — accounts are lost on exit");
        Box::new(MemoryStorage::new())
    } else {
        let storage = FileStorage::new(&args.data_dir);
        tracing::debug!(path = %storage.dir().display(), "using file storage");
        Box::new(storage)
    };
    let store = AccountStore::open(storage);

    match args.command {
        Command::Serve(serve_args) => serve(store, serve_args).await,
        command => commands::run(store, command),
    }
}

async fn serve(store: AccountStore, args: ServeArgs) -> eyre::Result<()> {
    tracing::info!(accounts = store.len(), "loaded account store");

    // Generate a random API token for this server session unless one was given.
    let api_token = args.api_token.unwrap_or_else(|| {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().gen();
        hex_encode(bytes)
    });

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let origin: HeaderValue = format!("http://{bind_addr}")
        .parse()
        .context("build CORS origin from bind address")?;

    let state = server::AppState {
        accounts: Arc::new(tokio::sync::RwLock::new(store)),
        api_token: api_token.clone(),
    };
    let router = server::build_router(state, origin);

    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 — it is accessible from the network");
    }

    println!();
    println!("  acctstore is running:");
    println!("    API:       http://{bind_addr}/api/v1/accounts");
    println!("    Token:     {api_token}");
    println!();

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("bind TCP listener")?;

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("run HTTP server")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Tiny hex-encoding helper to avoid adding a `hex` crate dependency.
fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}
