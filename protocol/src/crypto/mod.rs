//! # Cryptographic Primitives for Tally
//!
//! Tally needs exactly one primitive: a collision-resistant digest. We use
//! SHA-256 from the audited `sha2` crate and wrap it in a handful of
//! type-friendly helpers. Nothing here is hand-rolled.

pub mod hash;

pub use hash::{block_digest, sha256_multi};
