//! # CLI Interface
//!
//! Defines the command-line argument structure for `tally-node` using
//! `clap` derive. Supports three subcommands: `run`, `verify`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tally_protocol::config::{DEFAULT_HTTP_PORT, DEFAULT_METRICS_PORT};

use crate::logging::LogFormat;

/// Tally ledger node.
///
/// Holds one in-memory, hash-linked chain of measurement records and
/// serves it over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "tally-node",
    about = "Tally ledger node",
    version,
    propagate_version = true
)]
pub struct TallyNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the Tally node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP node.
    Run(RunArgs),
    /// Check a chain exported as JSON without starting a node.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Address to bind the HTTP and metrics listeners to.
    #[arg(long, env = "TALLY_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port for the HTTP API.
    #[arg(long, short = 'p', env = "TALLY_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "TALLY_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format.
    #[arg(
        long,
        value_enum,
        env = "TALLY_LOG_FORMAT",
        default_value = "pretty",
        ignore_case = true
    )]
    pub log_format: LogFormat,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// JSON file holding either a bare block list or a `{"chain": [...]}`
    /// document as returned by `GET /`.
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}
