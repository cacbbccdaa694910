//! # Storage Module
//!
//! The chain data model: records, blocks, validation, and the in-memory
//! chain that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! record.rs    — Record payload and its canonical encoding
//! block.rs     — Immutable Block, genesis, generate
//! validator.rs — Link and whole-chain checks
//! chain.rs     — Ordered block sequence: append, get, maybe_replace
//! ledger.rs    — Lock-guarded shared handle to the one chain
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! Record → Block::generate → validator::check_link → Chain (push)
//!                                                      ↓
//!                                         validator::check_chain
//! ```
//!
//! Everything lives in memory. Nothing is persisted.

pub mod block;
pub mod chain;
pub mod ledger;
pub mod record;
pub mod validator;

pub use block::Block;
pub use chain::{Chain, Replacement};
pub use ledger::Ledger;
pub use record::Record;
pub use validator::{is_valid_chain, is_valid_link, ChainFault, LinkFault};
