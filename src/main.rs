//! # Portal de Notícias
//!
//! A small news search site. A same-origin proxy endpoint forwards search
//! terms to the newsdata.io API and relays its JSON, and a search page
//! renders the results.
//!
//! ## Features
//!
//! - `GET /api/news?q=`: proxy to the upstream API with a configured key and
//!   language filter; upstream failures become a generic HTTP 500
//! - `GET /`: server-rendered search page (loading, results, empty and error
//!   states, at most 9 cards)
//! - `browse`: the same search page in the terminal, talking to a running
//!   server over HTTP
//!
//! ## Usage
//!
//! ```sh
//! NEWSDATA_API_KEY=pub_xxx portal_noticias serve
//! portal_noticias browse --server http://127.0.0.1:3000
//! ```

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod browse;
mod cli;
mod config;
mod error;
mod feed;
mod models;
mod page;
mod render;
mod server;
mod utils;

use api::{NewsDataClient, Proxy};
use cli::{Cli, Command, ServeArgs};
use config::UpstreamConfig;
use server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "portal_noticias starting up");

    let args = Cli::parse();

    let result = match args.command {
        Command::Serve(serve_args) => run_server(serve_args).await,
        Command::Browse(browse_args) => browse::run(browse_args).await,
    };

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result
}

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let config = UpstreamConfig::from_args(&args).inspect_err(|e| {
        error!(error = %e, "Invalid upstream configuration");
    })?;
    info!(?config, "Loaded upstream configuration");

    let default_query = config.default_query.clone();
    let proxy = Arc::new(Proxy::new(NewsDataClient::new(config), default_query.clone()));
    let app = server::router(AppState {
        proxy,
        default_query,
    });

    server::serve(&args.listen, app).await?;
    Ok(())
}
