//! # Prometheus Metrics
//!
//! Operational counters for the ledger, scraped at `/metrics` on the
//! metrics port. Everything is registered in a dedicated
//! [`prometheus::Registry`] prefixed `tally_`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the node.
#[derive(Clone)]
pub struct NodeMetrics {
    registry: Registry,
    /// Blocks successfully committed through `POST /`.
    pub blocks_appended_total: IntCounter,
    /// Appends rejected by validation.
    pub append_failures_total: IntCounter,
    /// Candidate chains adopted through `POST /replace`.
    pub chain_replacements_total: IntCounter,
    /// Current number of blocks, genesis included.
    pub chain_length: IntGauge,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("tally".into()), None)
            .expect("failed to create prometheus registry");

        let blocks_appended_total = IntCounter::new(
            "blocks_appended_total",
            "Total number of blocks appended to the chain",
        )
        .expect("metric creation");
        registry
            .register(Box::new(blocks_appended_total.clone()))
            .expect("metric registration");

        let append_failures_total = IntCounter::new(
            "append_failures_total",
            "Total number of appends rejected by validation",
        )
        .expect("metric creation");
        registry
            .register(Box::new(append_failures_total.clone()))
            .expect("metric registration");

        let chain_replacements_total = IntCounter::new(
            "chain_replacements_total",
            "Total number of times the chain was replaced by a longer valid chain",
        )
        .expect("metric creation");
        registry
            .register(Box::new(chain_replacements_total.clone()))
            .expect("metric registration");

        let chain_length = IntGauge::new("chain_length", "Number of blocks in the chain")
            .expect("metric creation");
        registry
            .register(Box::new(chain_length.clone()))
            .expect("metric registration");

        Self {
            registry,
            blocks_appended_total,
            append_failures_total,
            chain_replacements_total,
            chain_length,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics handle passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
