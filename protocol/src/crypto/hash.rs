//! # Hashing Utilities
//!
//! SHA-256 is the only digest in Tally. Blocks commit to their fields and
//! to their predecessor through it, and every digest that leaves the crate
//! is lowercase hex.
//!
//! ## Block digest preimage
//!
//! ```text
//! index (u64 LE) || timestamp (i64 LE) || record (16 canonical bytes) || previous_hash
//! ```
//!
//! Every field before `previous_hash` is fixed-width, so two different
//! field tuples can never produce the same preimage by shifting bytes
//! across a boundary.

use sha2::{Digest, Sha256};

use crate::storage::record::Record;

/// Hash multiple byte slices as if they were concatenated, without
/// allocating the concatenation.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Compute the digest a block with these fields must carry.
///
/// Pure: the same four inputs always give the same 64-character hex
/// string. The record contributes its canonical encoding, never anything
/// derived from where it lives in memory.
///
/// # Example
///
/// ```
/// use tally_protocol::crypto::hash::block_digest;
/// use tally_protocol::storage::Record;
///
/// let record = Record::new(70.5, 1000);
/// let a = block_digest(1, 42, &record, "abc");
/// let b = block_digest(1, 42, &record, "abc");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn block_digest(index: u64, timestamp: i64, record: &Record, previous_hash: &str) -> String {
    let digest = sha256_multi(&[
        &index.to_le_bytes(),
        &timestamp.to_le_bytes(),
        &record.canonical_bytes(),
        previous_hash.as_bytes(),
    ]);
    hex::encode(digest)
}
