//! Find-It · vulnerable snippet backend
//!
//! - Axum HTTP API serving annotated code snippets as "find the vulnerable
//!   line" puzzles and grading line selections
//! - Snippets are extracted from marker-annotated source files on first use
//!   and cached for the life of the process
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   FINDIT_CONFIG_PATH  : path to TOML config (snippet roots, codefixes dir, registry, hint templates)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod accuracy;
mod cache;
mod config;
mod domain;
mod error;
mod extract;
mod hints;
mod logic;
mod markers;
mod protocol;
mod routes;
mod scanner;
mod state;
mod telemetry;
mod util;
mod verdict;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::load_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_config_from_env();

  // Snippets are scanned lazily on the first request that needs them.
  let state = Arc::new(AppState::new(&cfg));

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "findit_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "findit_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "findit_backend", "Shutdown signal received");
}
