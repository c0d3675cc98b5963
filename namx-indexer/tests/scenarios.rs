//! End-to-end ingestion scenarios against a fake node and store.

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::sync::{mpsc, watch};

use common::*;
use namx_core::tx::{
    Commitment, DecryptedTx, Fee, Header, Section, SectionCode, SectionData, Tx, TxEnvelope,
    TxType, WrapperTx,
};
use namx_core::wire::Encode;
use namx_core::Checksums;
use namx_indexer::fetcher::{BlockPair, Fetcher};
use namx_indexer::processor::Processor;
use namx_indexer::IndexerError;
use namx_rpc::{Event, EventAttribute, EvidenceEnvelope, ResultBlockResults};
use namx_types::{
    Address, AddressHash, Amount, DenominatedAmount, Ed25519PublicKey, EstablishedAddress, Hash,
    ImplicitAddress, InternalAddress, PublicKey, Uint,
};

fn envelope(tx: &Tx) -> Vec<u8> {
    TxEnvelope { data: tx.to_bytes() }.encode_to_vec()
}

fn plain_header(tx_type: TxType) -> Header {
    Header {
        chain_id: "test-chain".to_string(),
        expiration: None,
        timestamp: "2024-02-06T12:00:00Z".to_string(),
        code_hash: Hash::ZERO,
        data_hash: Hash::ZERO,
        memo_hash: Hash::ZERO,
        tx_type,
    }
}

fn wrapper_tx() -> Tx {
    Tx {
        header: plain_header(TxType::Wrapper(Box::new(WrapperTx {
            fee: Fee {
                amount_per_gas_unit: DenominatedAmount {
                    amount: Amount(Uint([25, 0, 0, 0])),
                    denom: 6,
                },
                token: Address::Internal(InternalAddress::Multitoken),
            },
            pk: PublicKey::Ed25519(Ed25519PublicKey([7u8; 32])),
            epoch: 2,
            gas_limit: 20,
            unshield_section_hash: None,
        }))),
        sections: vec![],
    }
}

fn transfer_source() -> Address {
    Address::Implicit(ImplicitAddress(AddressHash([0xaa; 20])))
}

fn transfer_payload_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    transfer_source().encode(&mut bytes);
    Address::Established(EstablishedAddress {
        hash: AddressHash([0xbb; 20]),
    })
    .encode(&mut bytes);
    Address::Internal(InternalAddress::Multitoken).encode(&mut bytes);
    DenominatedAmount {
        amount: Amount(Uint([1_000_000, 0, 0, 0])),
        denom: 6,
    }
    .encode(&mut bytes);
    Option::<String>::None.encode(&mut bytes);
    Option::<Hash>::None.encode(&mut bytes);
    bytes
}

/// A decrypted tx carrying a code section (inline wasm) and a data
/// section with the given payload bytes.
fn decrypted_tx(wasm: &[u8], payload: Vec<u8>) -> Tx {
    let code_section = Section::Code(SectionCode {
        salt: [1u8; 8],
        code: Commitment::Id(wasm.to_vec()),
        tag: None,
    });
    let data_section = Section::Data(SectionData {
        salt: [2u8; 8],
        data: payload,
    });

    let mut header = plain_header(TxType::Decrypted(DecryptedTx::Decrypted));
    header.code_hash = code_section.hash();
    header.data_hash = data_section.hash();
    Tx {
        header,
        sections: vec![code_section, data_section],
    }
}

fn checksums_for(wasm: &[u8], name: &str) -> Checksums {
    let mut raw = HashMap::new();
    raw.insert(
        format!("{name}.wasm"),
        format!("{name}.{}", hex::encode(Sha256::digest(wasm))),
    );
    Checksums::from_raw(&raw).unwrap()
}

fn applied_event(tx: &Tx, code: i64) -> Event {
    Event {
        kind: "applied".to_string(),
        attributes: vec![
            EventAttribute {
                key: "hash".to_string(),
                value: tx.hash().to_string().to_uppercase(),
                index: true,
            },
            EventAttribute {
                key: "code".to_string(),
                value: code.to_string(),
                index: true,
            },
        ],
    }
}

fn results_with_events(height: i64, events: Vec<Event>) -> ResultBlockResults {
    ResultBlockResults {
        height,
        end_block_events: Some(events),
    }
}

/// Feed pre-fetched pairs straight into a processor and run it to
/// completion.
async fn run_processor(
    client: Arc<FakeClient>,
    store: FakeStore,
    checksums: Checksums,
    pairs: Vec<BlockPair>,
) -> namx_indexer::Result<()> {
    let (pair_tx, pair_rx) = mpsc::channel(pairs.len().max(1));
    for pair in pairs {
        pair_tx.send(pair).await.unwrap();
    }
    drop(pair_tx);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let result = Processor::new(client, store, checksums, pair_rx, shutdown_rx)
        .run()
        .await;
    drop(shutdown_tx);
    result
}

#[tokio::test]
async fn s1_empty_block() {
    let client = Arc::new(FakeClient::new(1));
    let block = make_block(1, vec![], 2, vec![]);
    let results = empty_results(1);
    client.add(block.clone(), results.clone());

    let store = FakeStore::new();
    let state = store.state.clone();

    run_processor(
        client,
        store,
        Checksums::default(),
        vec![BlockPair { block, results }],
    )
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.blocks.len(), 1);
    assert_eq!(state.blocks[0].header_height, 1);
    assert_eq!(state.blocks[0].block_id, block_hash(1));
    assert_eq!(state.commit_signatures.len(), 2);
    assert!(state.transactions.is_empty());
    assert!(state.evidences.is_empty());
    // Height 1 is the tip, so the one-shot index build ran.
    assert!(state.indexes_created);
    let last_height = state.blocks.iter().map(|b| b.header_height).max().unwrap();
    assert_eq!(last_height, 1);
}

#[tokio::test]
async fn s2_wrapper_and_decrypted_pair() {
    let wasm = b"transfer wasm code";
    let checksums = checksums_for(wasm, "tx_transfer");

    let wrapper = wrapper_tx();
    let block10 = make_block(10, vec![envelope(&wrapper)], 1, vec![]);

    let decrypted = decrypted_tx(wasm, transfer_payload_bytes());
    let block11 = make_block(11, vec![envelope(&decrypted)], 1, vec![]);
    let results11 = results_with_events(11, vec![applied_event(&decrypted, 0)]);

    let client = Arc::new(FakeClient::new(11));
    client.add(block10.clone(), empty_results(10));
    client.add(block11.clone(), results11.clone());

    let store = FakeStore::new();
    let state = store.state.clone();

    run_processor(
        client,
        store,
        checksums,
        vec![
            BlockPair {
                block: block10,
                results: empty_results(10),
            },
            BlockPair {
                block: block11,
                results: results11,
            },
        ],
    )
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.transactions.len(), 2);

    let wrapper_row = &state.transactions[0];
    assert_eq!(wrapper_row.tx_type, "Wrapper");
    assert_eq!(wrapper_row.hash, wrapper.hash().0.to_vec());
    assert_eq!(wrapper_row.gas_limit_multiplier, Some(20));
    assert_eq!(wrapper_row.fee_amount_per_gas_unit, "0.000025");
    assert!(!wrapper_row.fee_token.is_empty());
    assert!(wrapper_row.wrapper_id.is_none());
    assert_eq!(wrapper_row.data, Value::Null);

    let decrypted_row = &state.transactions[1];
    assert_eq!(decrypted_row.tx_type, "Decrypted");
    assert_eq!(decrypted_row.return_code, Some(0));
    assert_eq!(
        decrypted_row.wrapper_id.as_deref(),
        Some(wrapper.hash().0.as_slice())
    );

    let data = decrypted_row.data.as_object().unwrap();
    for key in ["source", "target", "token", "amount"] {
        assert!(data.contains_key(key), "missing key {key}");
    }
    assert_eq!(data["amount"], "1.000000");

    assert_eq!(state.account_transactions.len(), 1);
    assert_eq!(
        state.account_transactions[0].address,
        transfer_source().to_string()
    );
    assert_eq!(state.account_transactions[0].block_height, 11);
}

#[tokio::test]
async fn s3_unknown_payload_is_kept_as_hex() {
    let decrypted = decrypted_tx(b"some unknown wasm", vec![0xde, 0xad]);
    let block = make_block(5, vec![envelope(&decrypted)], 1, vec![]);
    let results = results_with_events(5, vec![applied_event(&decrypted, 0)]);

    let client = Arc::new(FakeClient::new(5));
    client.add(block.clone(), results.clone());

    let store = FakeStore::new();
    let state = store.state.clone();

    // The checksum map knows a different wasm, so the code hash
    // resolves to nothing.
    run_processor(
        client,
        store,
        checksums_for(b"known wasm", "tx_transfer"),
        vec![BlockPair { block, results }],
    )
    .await
    .unwrap();

    let state = state.lock().unwrap();
    let row = &state.transactions[0];
    assert_eq!(row.tx_type, "Decrypted");
    assert_eq!(row.data, Value::String("dead".to_string()));
    assert!(state.account_transactions.is_empty());
}

#[tokio::test]
async fn s4_failed_decrypted_tx_keeps_null_data() {
    let wasm = b"transfer wasm code";
    // A payload that would fail to decode if anyone tried.
    let decrypted = decrypted_tx(wasm, vec![0x01]);
    let block = make_block(6, vec![envelope(&decrypted)], 1, vec![]);
    let results = results_with_events(6, vec![applied_event(&decrypted, 2)]);

    let client = Arc::new(FakeClient::new(6));
    client.add(block.clone(), results.clone());

    let store = FakeStore::new();
    let state = store.state.clone();

    run_processor(
        client,
        store,
        checksums_for(wasm, "tx_transfer"),
        vec![BlockPair { block, results }],
    )
    .await
    .unwrap();

    let state = state.lock().unwrap();
    let row = &state.transactions[0];
    assert_eq!(row.return_code, Some(2));
    assert_eq!(row.data, Value::Null);
    assert!(state.account_transactions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn s5_rpc_hiccup_ingests_height_exactly_once() {
    let client = Arc::new(FakeClient::new(21));
    client.add_with_failures(make_block(20, vec![], 1, vec![]), empty_results(20), 1);
    client.add(make_block(21, vec![], 1, vec![]), empty_results(21));

    let (pair_tx, mut pair_rx) = mpsc::channel(4);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let fetcher = Fetcher::new(
        client.clone(),
        Duration::from_secs(5),
        pair_tx,
        shutdown_rx.clone(),
    );
    let fetcher_handle = tokio::spawn(fetcher.run(20));

    let first = pair_rx.recv().await.unwrap();
    let second = pair_rx.recv().await.unwrap();
    assert_eq!(first.block.block.header.height, 20);
    assert_eq!(second.block.block.header.height, 21);

    shutdown_tx.send(true).unwrap();
    fetcher_handle.await.unwrap();

    let store = FakeStore::new();
    let state = store.state.clone();
    run_processor(client, store, Checksums::default(), vec![first, second])
        .await
        .unwrap();

    let state = state.lock().unwrap();
    let mut heights: Vec<i64> = state.blocks.iter().map(|b| b.header_height).collect();
    heights.sort_unstable();
    assert_eq!(heights, vec![20, 21]);
}

#[tokio::test]
async fn s6_only_duplicate_vote_evidence_is_stored() {
    let voter = vec![0x77u8; 20];
    let duplicate = EvidenceEnvelope {
        kind: namx_rpc::DUPLICATE_VOTE_EVIDENCE_TYPE.to_string(),
        value: json!({
            "vote_a": {
                "height": "41",
                "round": 0,
                "timestamp": "2024-02-06T11:59:00Z",
                "validator_address": hex::encode(&voter),
                "validator_index": 0
            },
            "vote_b": {
                "height": "41",
                "round": 0,
                "timestamp": "2024-02-06T11:59:01Z",
                "validator_address": hex::encode(&voter),
                "validator_index": 0
            },
            "TotalVotingPower": "1000",
            "ValidatorPower": "250",
            "Timestamp": "2024-02-06T11:59:00Z"
        }),
    };
    let other = EvidenceEnvelope {
        kind: "tendermint/LightClientAttackEvidence".to_string(),
        value: json!({ "conflicting_block": {} }),
    };

    let block = make_block(42, vec![], 1, vec![duplicate, other]);
    let results = empty_results(42);
    let client = Arc::new(FakeClient::new(42));
    client.add(block.clone(), results.clone());

    let store = FakeStore::new();
    let state = store.state.clone();

    run_processor(
        client,
        store,
        Checksums::default(),
        vec![BlockPair { block, results }],
    )
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.evidences.len(), 1);
    let evidence = &state.evidences[0];
    assert_eq!(evidence.address, voter);
    assert_eq!(evidence.height, 41);
    assert_eq!(evidence.total_voting_power, 1000);
    assert_eq!(evidence.validator_power, 250);
    let expected_time: chrono::DateTime<chrono::Utc> =
        "2024-02-06T11:59:00Z".parse().unwrap();
    assert_eq!(evidence.time, expected_time.timestamp());
}

#[tokio::test]
async fn store_failure_leaves_the_height_unpersisted() {
    let client = Arc::new(FakeClient::new(1));
    let block = make_block(1, vec![], 2, vec![]);
    let results = empty_results(1);
    client.add(block.clone(), results.clone());

    let store = FakeStore::failing_at("transactions");
    let state = store.state.clone();

    let error = run_processor(
        client,
        store,
        Checksums::default(),
        vec![BlockPair { block, results }],
    )
    .await
    .unwrap_err();
    assert!(matches!(error, IndexerError::ProcessBlock { height: 1, .. }));

    // Nothing from the failed block is visible: staged inserts died
    // with the transaction handle.
    let state = state.lock().unwrap();
    assert!(state.blocks.is_empty());
    assert!(state.commit_signatures.is_empty());
    assert!(state.transactions.is_empty());
    assert!(!state.indexes_created);
}

#[tokio::test]
async fn first_block_of_a_run_has_no_wrapper_link() {
    let wasm = b"transfer wasm code";
    let decrypted = decrypted_tx(wasm, transfer_payload_bytes());
    let block = make_block(11, vec![envelope(&decrypted)], 1, vec![]);
    let results = results_with_events(11, vec![applied_event(&decrypted, 0)]);

    let client = Arc::new(FakeClient::new(11));
    client.add(block.clone(), results.clone());

    let store = FakeStore::new();
    let state = store.state.clone();

    // Block 10 exists on chain but was persisted by an earlier run;
    // the register starts empty, so no linkage is possible.
    run_processor(
        client,
        store,
        checksums_for(wasm, "tx_transfer"),
        vec![BlockPair { block, results }],
    )
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert!(state.transactions[0].wrapper_id.is_none());
}
