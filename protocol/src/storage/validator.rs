//! # Chain Validation
//!
//! Pure checks over blocks. Nothing here mutates or panics: an invalid
//! block is a normal outcome, reported as `false` by the `is_valid_*`
//! predicates or as a [`LinkFault`]/[`ChainFault`] by the `check_*`
//! variants when the caller wants to know what broke.
//!
//! A link `(old, new)` holds iff, checked in this order:
//!
//! 1. `old.index + 1 == new.index` (no successor exists past `u64::MAX`)
//! 2. `old.hash == new.previous_hash`
//! 3. `new.hash` equals the digest recomputed from `new`'s fields
//!
//! A chain holds iff it is non-empty, its first block is exactly
//! [`Block::genesis`], and every adjacent pair links.

use serde::Serialize;
use thiserror::Error;

use super::block::Block;

/// Why a single link failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkFault {
    #[error("index gap: expected {expected}, found {found}")]
    IndexGap { expected: u64, found: u64 },

    #[error("block {index} has no successor index")]
    IndexOverflow { index: u64 },

    #[error("block {index} previous_hash does not match predecessor hash")]
    PreviousHashMismatch { index: u64 },

    #[error("block {index} hash mismatch: stored={stored}, computed={computed}")]
    HashMismatch {
        index: u64,
        stored: String,
        computed: String,
    },
}

/// Why a whole chain failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainFault {
    /// A chain must contain at least its genesis block.
    #[error("chain is empty")]
    Empty,

    /// The first block is not the canonical genesis block.
    #[error("chain is not rooted at genesis: first block has index {index}, hash {hash}")]
    ForeignRoot { index: u64, hash: String },

    /// The block at `position` does not link to the one before it.
    #[error("broken link at position {position}: {fault}")]
    BrokenLink { position: usize, fault: LinkFault },
}

/// Check that `new` correctly extends `old`, reporting the first failed
/// condition.
pub fn check_link(new: &Block, old: &Block) -> Result<(), LinkFault> {
    let expected = old
        .index()
        .checked_add(1)
        .ok_or(LinkFault::IndexOverflow { index: old.index() })?;
    if new.index() != expected {
        return Err(LinkFault::IndexGap {
            expected,
            found: new.index(),
        });
    }

    if old.hash() != new.previous_hash() {
        return Err(LinkFault::PreviousHashMismatch { index: new.index() });
    }

    check_block_digest(new)
}

/// Check that a block's stored hash matches the digest of its fields.
pub fn check_block_digest(block: &Block) -> Result<(), LinkFault> {
    let computed = block.compute_hash();
    if computed != block.hash() {
        return Err(LinkFault::HashMismatch {
            index: block.index(),
            stored: block.hash().to_string(),
            computed,
        });
    }
    Ok(())
}

/// `true` iff `new` correctly extends `old`.
pub fn is_valid_link(new: &Block, old: &Block) -> bool {
    check_link(new, old).is_ok()
}

/// Check that `block` is the canonical genesis block, field for field.
pub fn check_root(block: &Block) -> Result<(), ChainFault> {
    if !block.is_genesis() || *block != Block::genesis() {
        return Err(ChainFault::ForeignRoot {
            index: block.index(),
            hash: block.hash().to_string(),
        });
    }
    Ok(())
}

/// Check the root, then every adjacent pair, stopping at the first
/// failure.
pub fn check_chain(blocks: &[Block]) -> Result<(), ChainFault> {
    let root = blocks.first().ok_or(ChainFault::Empty)?;
    check_root(root)?;

    for (i, pair) in blocks.windows(2).enumerate() {
        check_link(&pair[1], &pair[0]).map_err(|fault| ChainFault::BrokenLink {
            position: i + 1,
            fault,
        })?;
    }

    Ok(())
}

/// `true` iff the sequence is non-empty, rooted at genesis, and every
/// adjacent pair links.
pub fn is_valid_chain(blocks: &[Block]) -> bool {
    check_chain(blocks).is_ok()
}
