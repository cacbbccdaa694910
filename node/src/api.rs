//! # REST API
//!
//! Builds the axum router that exposes the ledger over HTTP. All endpoints
//! share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path              | Description                                  |
//! |--------|-------------------|----------------------------------------------|
//! | GET    | `/`               | Full chain                                   |
//! | POST   | `/`               | Append a record, respond with the full chain |
//! | GET    | `/blocks/:index`  | Block at a position                          |
//! | GET    | `/validate`       | Revalidate the whole chain                   |
//! | POST   | `/replace`        | Offer a candidate chain (longest valid wins) |
//! | GET    | `/health`         | Liveness probe                               |

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tally_protocol::storage::validator::check_chain;
use tally_protocol::storage::{Block, Chain, ChainFault, Ledger, Record, Replacement};
use tally_protocol::ChainError;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone: the ledger and metrics are both behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// The process-wide chain.
    pub ledger: Ledger,
    /// Prometheus handles for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(chain_handler).post(append_handler))
        .route("/blocks/:index", get(block_handler))
        .route("/validate", get(validate_handler))
        .route("/replace", post(replace_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// The full chain as exposed to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

impl From<Chain> for ChainResponse {
    fn from(chain: Chain) -> Self {
        Self {
            length: chain.len(),
            chain: chain.into_blocks(),
        }
    }
}

/// Body of a failed `POST /`: the error plus the unchanged chain.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppendErrorResponse {
    pub error: String,
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Response payload for `GET /validate`.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<ChainFault>,
}

/// Request body for `POST /replace`. Same shape as [`ChainResponse`];
/// `length` is ignored if present.
#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    pub chain: Vec<Block>,
}

/// Response payload for `POST /replace`.
#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub replacement: Replacement,
    pub length: usize,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_status(err: &ChainError) -> StatusCode {
    match err {
        ChainError::OutOfRange { .. } => StatusCode::NOT_FOUND,
        ChainError::InvalidBlock { .. } | ChainError::InvalidChain { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /` — returns the whole chain.
async fn chain_handler(State(state): State<AppState>) -> Json<ChainResponse> {
    Json(state.ledger.snapshot().into())
}

/// `POST /` — wraps the record in a new block and appends it.
///
/// Validation failures are internal faults (a corrupted tail), so they map
/// to 500. The body still carries the chain as it stands.
async fn append_handler(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> impl IntoResponse {
    match state.ledger.append(record) {
        Ok(chain) => {
            let block = chain.last();
            tracing::info!(index = block.index(), hash = %block.hash(), "record appended");
            state.metrics.blocks_appended_total.inc();
            state.metrics.chain_length.set(chain.len() as i64);
            (StatusCode::OK, Json(ChainResponse::from(chain))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "append rejected");
            state.metrics.append_failures_total.inc();
            let chain = state.ledger.snapshot();
            let body = AppendErrorResponse {
                error: e.to_string(),
                length: chain.len(),
                chain: chain.into_blocks(),
            };
            (error_status(&e), Json(body)).into_response()
        }
    }
}

/// `GET /blocks/:index` — returns a single block, 404 when out of range.
async fn block_handler(
    Path(index): Path<usize>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.ledger.get(index) {
        Ok(block) => (StatusCode::OK, Json(block)).into_response(),
        Err(e) => {
            let err = ErrorResponse {
                error: e.to_string(),
            };
            (error_status(&e), Json(err)).into_response()
        }
    }
}

/// `GET /validate` — revalidates every link of the current chain.
async fn validate_handler(State(state): State<AppState>) -> Json<ValidateResponse> {
    let chain = state.ledger.snapshot();
    let fault = check_chain(chain.blocks()).err();
    Json(ValidateResponse {
        valid: fault.is_none(),
        length: chain.len(),
        fault,
    })
}

/// `POST /replace` — offers a candidate chain. It is adopted only if it is
/// strictly longer and valid; otherwise nothing changes.
async fn replace_handler(
    State(state): State<AppState>,
    Json(req): Json<ReplaceRequest>,
) -> Json<ReplaceResponse> {
    let candidate = Chain::from_blocks(req.chain);
    let replacement = state.ledger.maybe_replace(candidate);
    if replacement.is_replaced() {
        state.metrics.chain_replacements_total.inc();
    }
    let length = state.ledger.len();
    state.metrics.chain_length.set(length as i64);
    Json(ReplaceResponse {
        replacement,
        length,
    })
}

/// `GET /health` — returns 200 while the process is up.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "version": state.version })),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
