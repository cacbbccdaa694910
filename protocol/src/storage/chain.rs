//! # In-memory Chain
//!
//! The ordered, append-only sequence of blocks. A chain is never empty:
//! construction synthesizes the genesis block when given nothing.
//!
//! ## Append protocol
//!
//! ```text
//! generate(last, record) → digest(last) + check_link(candidate, last) → push → check_chain
//!                                    │ fail                                     │ fail
//!                                    ▼                                          ▼
//!                              InvalidBlock                              pop, InvalidChain
//! ```
//!
//! Both failure paths leave the chain exactly as it was.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::record::Record;
use super::validator::{check_block_digest, check_chain, check_link, ChainFault};
use crate::error::ChainError;

/// Outcome of [`Chain::maybe_replace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Replacement {
    /// The candidate was adopted.
    Replaced { previous_len: usize, new_len: usize },
    /// The candidate was not strictly longer; nothing changed.
    NotLonger {
        current_len: usize,
        candidate_len: usize,
    },
    /// The candidate was longer but failed validation; nothing changed.
    InvalidCandidate { fault: ChainFault },
}

impl Replacement {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Replacement::Replaced { .. })
    }
}

/// Ordered chain of blocks, genesis first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Block>", into = "Vec<Block>")]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// A fresh chain holding only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Adopt an existing block sequence as-is.
    ///
    /// An empty vector yields a fresh genesis chain. The blocks are not
    /// validated here; call [`Chain::is_valid`] or hand the chain to
    /// [`Chain::maybe_replace`], which does.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }
        Self { blocks }
    }

    /// Number of blocks. Always at least 1.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The tail block.
    pub fn last(&self) -> &Block {
        // Non-empty by construction.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Block at position `i`.
    pub fn get(&self, i: usize) -> Result<&Block, ChainError> {
        self.blocks.get(i).ok_or(ChainError::OutOfRange {
            index: i,
            len: self.blocks.len(),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Whether the chain is rooted at genesis and every adjacent pair links.
    pub fn is_valid(&self) -> bool {
        check_chain(&self.blocks).is_ok()
    }

    /// Wrap `record` in a new block and commit it to the tail.
    ///
    /// All-or-nothing: on error the chain is unchanged.
    ///
    /// # Errors
    ///
    /// - [`ChainError::InvalidBlock`] if the candidate does not link to the
    ///   current tail (only possible with a corrupted tail).
    /// - [`ChainError::InvalidChain`] if full revalidation fails after the
    ///   commit. The commit is undone first.
    pub fn append(&mut self, record: Record) -> Result<&Block, ChainError> {
        let candidate = Block::generate(self.last(), record);
        self.append_block(candidate)
    }

    /// Commit an already-constructed block, with the same checks and
    /// rollback as [`Chain::append`].
    ///
    /// The tail's own digest is checked as well: a candidate generated from
    /// a tampered tail inherits the tampered hash as its `previous_hash`
    /// and would otherwise link cleanly.
    pub fn append_block(&mut self, block: Block) -> Result<&Block, ChainError> {
        let linked =
            check_block_digest(self.last()).and_then(|_| check_link(&block, self.last()));
        if let Err(fault) = linked {
            tracing::error!(index = block.index(), %fault, "rejected block: does not extend tail");
            return Err(ChainError::InvalidBlock {
                index: block.index(),
                fault,
            });
        }

        self.blocks.push(block);

        if let Err(fault) = check_chain(&self.blocks) {
            self.blocks.pop();
            tracing::error!(%fault, "chain failed revalidation after append; rolled back");
            return Err(ChainError::InvalidChain { fault });
        }

        let tail = self.last();
        tracing::debug!(index = tail.index(), hash = %tail.hash(), "block appended");
        Ok(tail)
    }

    /// Longest-valid-chain-wins: adopt `candidate` wholesale if it is
    /// strictly longer than `self` and passes full validation, root
    /// included.
    ///
    /// Length is compared first, so shorter candidates are never validated.
    pub fn maybe_replace(&mut self, candidate: Chain) -> Replacement {
        let current_len = self.len();
        let candidate_len = candidate.len();

        if candidate_len <= current_len {
            return Replacement::NotLonger {
                current_len,
                candidate_len,
            };
        }

        if let Err(fault) = check_chain(&candidate.blocks) {
            tracing::warn!(candidate_len, %fault, "rejected longer but invalid candidate chain");
            return Replacement::InvalidCandidate { fault };
        }

        self.blocks = candidate.blocks;
        tracing::info!(
            previous_len = current_len,
            new_len = candidate_len,
            "chain replaced"
        );
        Replacement::Replaced {
            previous_len: current_len,
            new_len: candidate_len,
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Block>> for Chain {
    fn from(blocks: Vec<Block>) -> Self {
        Self::from_blocks(blocks)
    }
}

impl From<Chain> for Vec<Block> {
    fn from(chain: Chain) -> Self {
        chain.blocks
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
