//! Error types for chain operations.
//!
//! Every fallible [`Chain`](crate::storage::Chain) operation returns a
//! [`ChainError`]. Validation predicates themselves never error: they
//! answer `false` (or a [`LinkFault`]/[`ChainFault`] describing why).

use thiserror::Error;

use crate::storage::validator::{ChainFault, LinkFault};

/// Errors surfaced by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A freshly generated candidate did not link to the current tail.
    /// Only reachable if the tail itself was corrupted.
    #[error("invalid block at index {index}: {fault}")]
    InvalidBlock {
        /// Index the candidate would have occupied.
        index: u64,
        /// Which link check failed.
        fault: LinkFault,
    },

    /// Whole-chain validation failed after a commit. The commit was rolled
    /// back before this was returned.
    #[error("invalid chain: {fault}")]
    InvalidChain {
        /// First broken position in the chain.
        fault: ChainFault,
    },

    /// Lookup outside `[0, len)`.
    #[error("block index {index} out of range (chain length {len})")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Chain length at the time of the lookup.
        len: usize,
    },
}
