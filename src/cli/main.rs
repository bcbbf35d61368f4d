mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use bank_ledger::{LedgerEngine, LedgerStore};
use commands::{Args, Parser};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of info (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Initialize the store and engine
    let store = Arc::new(LedgerStore::new(args.store_config()));
    let engine = LedgerEngine::new(Arc::clone(&store));

    // 2. Open the accounts requested on the command line
    for username in &args.users {
        engine
            .open_account(username)
            .with_context(|| format!("Failed to open account for {username}"))?;
    }

    // 3. Serve until Ctrl-C
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, bank_ledger::api::router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // 4. Anything still queued after the drain fails cleanly instead of half-applying
    store.close();
    log::info!(
        "Shutdown complete: {} accounts, {} transactions",
        store.account_count(),
        store.transaction_count()
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received, draining requests");
}
