use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::{info, Level};

mod domain;
mod rest;
mod storage;

use domain::LedgerService;
use rest::{create_router, AppState};
use storage::LedgerStore;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LEDGER_FILE: &str = "expenses.json";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let ledger_file =
        std::env::var("LEDGER_FILE").unwrap_or_else(|_| DEFAULT_LEDGER_FILE.to_string());
    info!("Opening ledger file {}", ledger_file);
    let store = LedgerStore::open(ledger_file)?;

    let state = AppState::new(LedgerService::new(store));
    let app = create_router(state);

    let port = match std::env::var("PORT") {
        Ok(value) => value.parse().context("invalid PORT value")?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
