//! # Records
//!
//! The payload carried by each block: a body-weight measurement and the
//! moment it was taken. The chain never interprets these values; it only
//! needs a stable byte encoding to hash and structural equality to compare.

use serde::{Deserialize, Serialize};

/// Length in bytes of [`Record::canonical_bytes`].
pub const RECORD_ENCODED_LEN: usize = 16;

/// One measurement entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Measured weight.
    pub weight: f64,
    /// Epoch timestamp (milliseconds) the measurement refers to.
    pub date: i64,
}

impl Record {
    pub fn new(weight: f64, date: i64) -> Self {
        Self { weight, date }
    }

    /// The designated empty record carried by the genesis block.
    pub fn zero() -> Self {
        Self {
            weight: 0.0,
            date: 0,
        }
    }

    /// Deterministic encoding used as hash input.
    ///
    /// `weight.to_bits()` (LE) followed by `date` (LE). The encoding is
    /// bit-exact: `0.0` and `-0.0` produce different bytes, and so do
    /// distinct NaN payloads.
    pub fn canonical_bytes(&self) -> [u8; RECORD_ENCODED_LEN] {
        let mut out = [0u8; RECORD_ENCODED_LEN];
        out[..8].copy_from_slice(&self.weight.to_bits().to_le_bytes());
        out[8..].copy_from_slice(&self.date.to_le_bytes());
        out
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::zero()
    }
}
