//! End-to-end tests for the Tally ledger.
//!
//! These exercise the public API only: build chains through appends,
//! round-trip them through JSON the way the node's transport does, tamper
//! with the serialized form, and feed the result back through validation
//! and replacement.

use std::thread;

use tally_protocol::crypto::hash::block_digest;
use tally_protocol::storage::{
    is_valid_chain, is_valid_link, Block, Chain, ChainFault, Ledger, LinkFault, Record,
    Replacement,
};
use tally_protocol::ChainError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn chain_with(records: &[(f64, i64)]) -> Chain {
    let mut chain = Chain::new();
    for &(weight, date) in records {
        chain.append(Record::new(weight, date)).expect("append");
    }
    chain
}

/// Serialize `chain`, let `edit` mutate the JSON of block `pos`, and parse
/// it back. Mirrors a peer handing us a doctored chain.
fn tamper_json(chain: &Chain, pos: usize, edit: impl FnOnce(&mut serde_json::Value)) -> Chain {
    let mut json = serde_json::to_value(chain).expect("serialize");
    edit(&mut json[pos]);
    serde_json::from_value(json).expect("deserialize")
}

const TAMPERABLE_FIELDS: [&str; 6] = [
    "index",
    "timestamp",
    "weight",
    "date",
    "previous_hash",
    "hash",
];

/// Replace one field of a serialized block with a different, well-typed value.
fn overwrite_field(block: &mut serde_json::Value, field: &str) {
    match field {
        "index" => block["index"] = 9.into(),
        "timestamp" => block["timestamp"] = 1.into(),
        "weight" => block["record"]["weight"] = 99.9.into(),
        "date" => block["record"]["date"] = 7.into(),
        "previous_hash" => block["previous_hash"] = "00".into(),
        "hash" => block["hash"] = "ab".repeat(32).into(),
        other => panic!("unknown field {other}"),
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn fresh_chain_is_just_genesis() {
    let chain = Chain::new();
    assert_eq!(chain.len(), 1);
    let genesis = chain.get(0).unwrap();
    assert_eq!(genesis.index(), 0);
    assert_eq!(genesis.previous_hash(), "");
    assert!(is_valid_chain(chain.blocks()));
}

#[test]
fn weight_log_end_to_end() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000)]);

    assert_eq!(chain.len(), 3);
    assert_eq!(
        chain.get(1).unwrap().previous_hash(),
        chain.get(0).unwrap().hash()
    );
    assert_eq!(
        chain.get(2).unwrap().previous_hash(),
        chain.get(1).unwrap().hash()
    );
    assert_eq!(chain.get(1).unwrap().record(), &Record::new(70.5, 1000));
    assert_eq!(chain.get(2).unwrap().record(), &Record::new(71.0, 2000));
    assert!(is_valid_chain(chain.blocks()));
}

#[test]
fn stored_hashes_match_public_digest_function() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000), (70.8, 3000)]);
    for block in &chain {
        assert_eq!(
            block.hash(),
            block_digest(
                block.index(),
                block.timestamp(),
                block.record(),
                block.previous_hash()
            )
        );
    }
}

#[test]
fn every_link_of_an_appended_chain_is_valid() {
    let chain = chain_with(&[(1.0, 1), (2.0, 2), (3.0, 3), (4.0, 4)]);
    for pair in chain.blocks().windows(2) {
        assert!(is_valid_link(&pair[1], &pair[0]));
    }
}

// ---------------------------------------------------------------------------
// Tamper detection through the serialized form
// ---------------------------------------------------------------------------

#[test]
fn json_roundtrip_preserves_validity() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000)]);
    let text = serde_json::to_string_pretty(&chain).unwrap();
    let back: Chain = serde_json::from_str(&text).unwrap();
    assert_eq!(back, chain);
    assert!(back.is_valid());
}

#[test]
fn tampered_json_fields_are_detected() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000), (72.0, 3000)]);

    for pos in 1..chain.len() {
        for field in TAMPERABLE_FIELDS {
            let doctored = tamper_json(&chain, pos, |b| overwrite_field(b, field));
            assert!(
                !doctored.is_valid(),
                "edit of `{field}` at block {pos} went unnoticed"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Append failure semantics
// ---------------------------------------------------------------------------

#[test]
fn append_onto_tampered_tail_fails_without_growing() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000)]);
    let mut chain = tamper_json(&chain, 2, |b| b["hash"] = "f".repeat(64).into());

    let err = chain.append(Record::new(72.0, 3000)).unwrap_err();
    assert!(matches!(
        err,
        ChainError::InvalidBlock {
            index: 3,
            fault: LinkFault::HashMismatch { index: 2, .. }
        }
    ));
    assert_eq!(chain.len(), 3);
}

#[test]
fn append_onto_corrupt_history_rolls_back() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000), (72.0, 3000)]);
    let mut chain = tamper_json(&chain, 1, |b| b["record"]["weight"] = 10.0.into());
    let before = chain.clone();

    let err = chain.append(Record::new(73.0, 4000)).unwrap_err();
    assert!(matches!(
        err,
        ChainError::InvalidChain {
            fault: ChainFault::BrokenLink { position: 1, .. }
        }
    ));
    assert_eq!(chain, before);
}

#[test]
fn errors_render_readable_messages() {
    let chain = Chain::new();
    let err = chain.get(4).unwrap_err();
    assert_eq!(
        err.to_string(),
        "block index 4 out of range (chain length 1)"
    );
}

// ---------------------------------------------------------------------------
// Replacement
// ---------------------------------------------------------------------------

#[test]
fn longer_valid_chain_replaces_shorter() {
    let mut a = chain_with(&[(1.0, 1), (2.0, 2)]);
    let b = chain_with(&[(5.0, 5), (6.0, 6), (7.0, 7), (8.0, 8)]);

    assert!(a.maybe_replace(b.clone()).is_replaced());
    assert_eq!(a, b);
}

#[test]
fn shorter_chain_never_replaces() {
    let mut a = chain_with(&[(1.0, 1), (2.0, 2)]);
    let before = a.clone();
    let b = chain_with(&[(5.0, 5)]);

    assert!(matches!(
        a.maybe_replace(b),
        Replacement::NotLonger {
            current_len: 3,
            candidate_len: 2
        }
    ));
    assert_eq!(a, before);
}

#[test]
fn longer_forged_chain_is_rejected() {
    let mut a = chain_with(&[(1.0, 1)]);
    let before = a.clone();
    let forged = tamper_json(
        &chain_with(&[(5.0, 5), (6.0, 6), (7.0, 7)]),
        2,
        |b| b["record"]["date"] = 123.into(),
    );

    assert!(matches!(
        a.maybe_replace(forged),
        Replacement::InvalidCandidate { .. }
    ));
    assert_eq!(a, before);
}

#[test]
fn longer_chain_with_rerooted_history_is_rejected() {
    // Drop the real genesis: block 1 becomes the root and every remaining
    // link still holds.
    let source = chain_with(&[(5.0, 5), (6.0, 6), (7.0, 7), (8.0, 8)]);
    let blocks = source.blocks()[1..].to_vec();
    for pair in blocks.windows(2) {
        assert!(is_valid_link(&pair[1], &pair[0]));
    }

    let mut a = Chain::new();
    let outcome = a.maybe_replace(Chain::from_blocks(blocks));

    assert!(matches!(
        outcome,
        Replacement::InvalidCandidate {
            fault: ChainFault::ForeignRoot { index: 1, .. }
        }
    ));
    assert_eq!(a.get(0).unwrap(), &Block::genesis());
}

#[test]
fn candidate_with_top_of_range_index_is_rejected_cleanly() {
    let json = serde_json::json!([
        { "index": u64::MAX, "timestamp": 0,
          "record": { "weight": 0.0, "date": 0 },
          "previous_hash": "", "hash": "aa" },
        { "index": 0, "timestamp": 0,
          "record": { "weight": 0.0, "date": 0 },
          "previous_hash": "aa", "hash": "bb" },
    ]);
    let candidate: Chain = serde_json::from_value(json).expect("deserialize");

    assert!(!is_valid_chain(candidate.blocks()));
    let mut a = Chain::new();
    assert!(matches!(
        a.maybe_replace(candidate),
        Replacement::InvalidCandidate { .. }
    ));
    assert_eq!(a.len(), 1);
}

#[test]
fn tampered_genesis_is_detected() {
    let chain = chain_with(&[(70.5, 1000), (71.0, 2000)]);
    for field in TAMPERABLE_FIELDS {
        let doctored = tamper_json(&chain, 0, |b| overwrite_field(b, field));
        assert!(!doctored.is_valid(), "edit of genesis `{field}` went unnoticed");
    }
}

#[test]
fn candidate_without_blocks_becomes_genesis_and_is_not_longer() {
    let mut a = Chain::new();
    let empty = Chain::from_blocks(Vec::<Block>::new());
    assert!(!a.maybe_replace(empty).is_replaced());
}

// ---------------------------------------------------------------------------
// Shared ledger
// ---------------------------------------------------------------------------

#[test]
fn ledger_serializes_concurrent_writers() {
    let ledger = Ledger::new();
    let mut handles = Vec::new();

    for t in 0..4 {
        let ledger = ledger.clone();
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                ledger.append(Record::new(t as f64, i)).expect("append");
                // Interleave reads with writes.
                let _ = ledger.last();
            }
        }));
    }
    for h in handles {
        h.join().expect("thread");
    }

    assert_eq!(ledger.len(), 201);
    assert!(ledger.is_valid());
}
