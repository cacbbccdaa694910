//! # Protocol Configuration & Constants
//!
//! Every fixed value of the ledger lives here. Changing any of the genesis
//! constants changes the genesis hash, which invalidates every chain built
//! before the change.

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// The ledger format version.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Digest used for block hashes.
pub const HASH_FUNCTION: &str = "SHA-256";

/// Raw digest length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Length of a hex-encoded block hash.
pub const DIGEST_HEX_LENGTH: usize = HASH_OUTPUT_LENGTH * 2;

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Index of the genesis block.
pub const GENESIS_INDEX: u64 = 0;

/// Timestamp of the genesis block. Fixed so every process derives the same
/// genesis hash.
pub const GENESIS_TIMESTAMP: i64 = 0;

/// The genesis block has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "";

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Default HTTP API port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default metrics (Prometheus) port.
pub const DEFAULT_METRICS_PORT: u16 = 8081;
