//! # Block Structure
//!
//! A block is one immutable entry in the chain. It carries a [`Record`],
//! its position, its creation time, and the digest of its predecessor.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  index: u64          (genesis = 0)          │
//! │  timestamp: i64      (Unix ms)              │
//! │  record: Record      (weight, date)         │
//! │  previous_hash: hex  ("" for genesis)       │
//! │  hash: hex           (SHA-256, see below)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Hash Computation
//!
//! `hash = block_digest(index, timestamp, record, previous_hash)`, computed
//! once at construction. Fields are private and there are no setters, so
//! the stored hash cannot drift from its inputs after construction.
//! Blocks rebuilt from external data via [`Block::from_parts`] or serde keep
//! whatever hash they were given; validation is what catches a mismatch.

use serde::{Deserialize, Serialize};

use crate::config::{GENESIS_INDEX, GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP};
use crate::crypto::hash::block_digest;
use crate::storage::record::Record;

/// An immutable chain entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: i64,
    record: Record,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Construct the genesis block.
    ///
    /// Index 0, timestamp 0, the zero record, and an empty previous hash.
    /// Every process derives the same genesis hash.
    pub fn genesis() -> Self {
        Self::seal(
            GENESIS_INDEX,
            GENESIS_TIMESTAMP,
            Record::zero(),
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Construct a new block linked to `previous`, stamped with the current
    /// wall-clock time.
    ///
    /// No validation happens here. The caller checks the result against the
    /// tail before committing it.
    pub fn generate(previous: &Block, record: Record) -> Self {
        Self::generate_at(previous, record, chrono::Utc::now().timestamp_millis())
    }

    /// Same as [`Block::generate`] with an explicit timestamp.
    ///
    /// The index saturates at `u64::MAX`; such a block never links.
    pub fn generate_at(previous: &Block, record: Record, timestamp: i64) -> Self {
        Self::seal(
            previous.index.saturating_add(1),
            timestamp,
            record,
            previous.hash.clone(),
        )
    }

    /// Reassemble a block from stored fields without recomputing its hash.
    ///
    /// Use this for blocks that arrive from outside the process. The result
    /// may well be inconsistent; run it through the validator before
    /// trusting it.
    pub fn from_parts(
        index: u64,
        timestamp: i64,
        record: Record,
        previous_hash: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            index,
            timestamp,
            record,
            previous_hash: previous_hash.into(),
            hash: hash.into(),
        }
    }

    fn seal(index: u64, timestamp: i64, record: Record, previous_hash: String) -> Self {
        let hash = block_digest(index, timestamp, &record, &previous_hash);
        Self {
            index,
            timestamp,
            record,
            previous_hash,
            hash,
        }
    }

    /// Recompute the digest from the stored fields.
    ///
    /// Never writes the result back. Compare it against [`Block::hash`] to
    /// detect tampering.
    pub fn compute_hash(&self) -> String {
        block_digest(self.index, self.timestamp, &self.record, &self.previous_hash)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX && self.previous_hash.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
