// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tally — Core Library
//!
//! A tamper-evident, append-only chain of measurement records. Every block
//! commits to its own fields and to the hash of the block before it, so
//! editing any stored value anywhere in history is detectable by
//! revalidating the chain.
//!
//! ## Architecture
//!
//! - **crypto** — SHA-256 helpers and the block digest function.
//! - **storage** — Records, blocks, validation, the chain, and the shared ledger.
//! - **error** — Typed failures for chain operations.
//! - **config** — Genesis constants and default ports.
//!
//! ## Quick tour
//!
//! ```
//! use tally_protocol::storage::{Chain, Record};
//!
//! let mut chain = Chain::new();
//! chain.append(Record::new(70.5, 1000)).unwrap();
//! chain.append(Record::new(71.0, 2000)).unwrap();
//!
//! assert_eq!(chain.len(), 3);
//! assert!(chain.is_valid());
//! ```
//!
//! Single process, single writer, in memory. No networking, consensus, or
//! persistence lives here.

pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;

pub use error::ChainError;
