//! Process-wide ledger handle.
//!
//! Wraps the single [`Chain`] in `Arc<RwLock<_>>`. Reads share the lock;
//! `append` and `maybe_replace` hold the write lock for the whole
//! generate → validate → commit sequence, so two writers can never both
//! build on the same tail.

use std::sync::Arc;

use parking_lot::RwLock;

use super::block::Block;
use super::chain::{Chain, Replacement};
use super::record::Record;
use crate::error::ChainError;

/// Cheap-to-clone handle to the shared chain.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    chain: Arc<RwLock<Chain>>,
}

impl Ledger {
    /// A ledger holding a fresh genesis chain.
    pub fn new() -> Self {
        Self::with_chain(Chain::new())
    }

    pub fn with_chain(chain: Chain) -> Self {
        Self {
            chain: Arc::new(RwLock::new(chain)),
        }
    }

    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.read().is_empty()
    }

    pub fn last(&self) -> Block {
        self.chain.read().last().clone()
    }

    pub fn get(&self, i: usize) -> Result<Block, ChainError> {
        self.chain.read().get(i).cloned()
    }

    /// Copy of the whole chain at this instant.
    pub fn snapshot(&self) -> Chain {
        self.chain.read().clone()
    }

    pub fn is_valid(&self) -> bool {
        self.chain.read().is_valid()
    }

    /// Append under the write lock.
    ///
    /// Returns the chain as it stood right after this commit, cloned before
    /// the guard is released. The committed block is its [`Chain::last`].
    pub fn append(&self, record: Record) -> Result<Chain, ChainError> {
        let mut chain = self.chain.write();
        chain.append(record)?;
        Ok(chain.clone())
    }

    /// Offer a candidate chain under the write lock.
    pub fn maybe_replace(&self, candidate: Chain) -> Replacement {
        self.chain.write().maybe_replace(candidate)
    }
}
