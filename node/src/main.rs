// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tally Node
//!
//! Entry point for the `tally-node` binary. Parses CLI arguments,
//! initializes logging and metrics, creates the process-wide ledger, and
//! serves the HTTP API.
//!
//! The binary supports three subcommands:
//!
//! - `run`     — start the node
//! - `verify`  — validate a chain exported as JSON
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;

use tally_protocol::storage::validator::check_chain;
use tally_protocol::storage::{Block, Chain, Ledger};

use cli::{Commands, TallyNodeCli};
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TallyNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Verify(args) => verify_file(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the node: API server and metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init(args.log_format);

    tracing::info!(
        bind = %args.bind,
        port = args.port,
        metrics_port = args.metrics_port,
        log_format = ?args.log_format,
        "starting tally-node"
    );

    // --- Ledger ---
    // One chain per process, created with its genesis block and never torn
    // down explicitly.
    let ledger = Ledger::new();
    let genesis = ledger.last();
    tracing::info!(hash = %genesis.hash(), "genesis block created");

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());
    node_metrics.chain_length.set(ledger.len() as i64);

    // --- Application state ---
    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            tally_protocol::config::PROTOCOL_VERSION,
        ),
        ledger,
        metrics: Arc::clone(&node_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("{}:{}", args.bind, args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("{}:{}", args.bind, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("tally-node stopped");
    Ok(())
}

/// Accepted shapes for an exported chain file.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChainDocument {
    /// `{"chain": [...]}` as served by `GET /`.
    Wrapped { chain: Vec<Block> },
    /// A bare block list.
    Bare(Vec<Block>),
}

/// Reads and parses a chain export. An empty block list yields a genesis
/// chain, like every other way of building a chain.
fn load_chain(path: &Path) -> Result<Chain> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read chain file {}", path.display()))?;
    let doc: ChainDocument = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse chain file {}", path.display()))?;
    let blocks = match doc {
        ChainDocument::Wrapped { chain } | ChainDocument::Bare(chain) => chain,
    };
    Ok(Chain::from_blocks(blocks))
}

/// Validates an exported chain offline and prints the verdict.
///
/// Exits non-zero (via the returned error) when the chain is invalid.
fn verify_file(args: cli::VerifyArgs) -> Result<()> {
    let chain = load_chain(&args.file)?;
    match check_chain(chain.blocks()) {
        Ok(()) => {
            println!("valid: {} block(s), tip {}", chain.len(), chain.last().hash());
            Ok(())
        }
        Err(fault) => {
            println!("invalid: {}", fault);
            Err(anyhow::anyhow!("chain in {} is invalid: {}", args.file.display(), fault))
        }
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("tally-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol   {}", tally_protocol::config::PROTOCOL_VERSION);
    println!("hash       {}", tally_protocol::config::HASH_FUNCTION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
