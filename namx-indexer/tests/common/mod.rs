//! In-memory fakes for the RPC client and the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use namx_rpc::{
    Base64Bytes, Block, BlockData, BlockId, ChainClient, Commit, CommitSig, Error as RpcError,
    EvidenceEnvelope, EvidenceList, Header, HexBytes, PartSetHeader, ResultBlock,
    ResultBlockResults, Version,
};
use namx_store::{
    AccountTransaction, CommitSignature, Evidence, Store, StoreError, Transaction,
};

pub fn test_time() -> DateTime<Utc> {
    "2024-02-06T12:00:00Z".parse().unwrap()
}

/// A fabricated block id: the height byte repeated.
pub fn block_hash(height: i64) -> Vec<u8> {
    vec![height as u8; 32]
}

/// Build a consensus block with the given raw tx blobs, commit
/// signature count and evidence entries.
pub fn make_block(
    height: i64,
    txs: Vec<Vec<u8>>,
    signature_count: usize,
    evidence: Vec<EvidenceEnvelope>,
) -> ResultBlock {
    let time = test_time();
    let signatures = (0..signature_count)
        .map(|i| CommitSig {
            block_id_flag: 2,
            validator_address: HexBytes(vec![i as u8 + 1; 20]),
            timestamp: time,
            signature: Some(Base64Bytes(vec![9u8; 64])),
        })
        .collect();

    ResultBlock {
        block_id: BlockId {
            hash: HexBytes(block_hash(height)),
            parts: PartSetHeader {
                total: 1,
                hash: HexBytes(vec![0x11; 32]),
            },
        },
        block: Block {
            header: Header {
                version: Version { block: 11, app: 0 },
                chain_id: "test-chain".to_string(),
                height,
                time,
                last_block_id: BlockId::default(),
                last_commit_hash: HexBytes::default(),
                data_hash: HexBytes::default(),
                validators_hash: HexBytes(vec![0x22; 32]),
                next_validators_hash: HexBytes(vec![0x22; 32]),
                consensus_hash: HexBytes(vec![0x33; 32]),
                app_hash: HexBytes(vec![0x44; 32]),
                last_results_hash: HexBytes::default(),
                evidence_hash: HexBytes::default(),
                proposer_address: HexBytes(vec![0x55; 20]),
            },
            data: BlockData {
                txs: txs.into_iter().map(Base64Bytes).collect(),
            },
            evidence: EvidenceList { evidence },
            last_commit: Some(Commit {
                height: height - 1,
                round: 0,
                block_id: BlockId::default(),
                signatures,
            }),
        },
    }
}

pub fn empty_results(height: i64) -> ResultBlockResults {
    ResultBlockResults {
        height,
        end_block_events: None,
    }
}

struct ScriptedHeight {
    /// Remaining calls to fail with BlockNotFound before succeeding.
    failures: usize,
    block: ResultBlock,
    results: ResultBlockResults,
}

/// Fake node: a scripted set of heights, with optional leading
/// failures per height.
pub struct FakeClient {
    tip: i64,
    heights: Mutex<HashMap<i64, ScriptedHeight>>,
}

impl FakeClient {
    pub fn new(tip: i64) -> Self {
        Self {
            tip,
            heights: Mutex::new(HashMap::new()),
        }
    }

    pub fn add(&self, block: ResultBlock, results: ResultBlockResults) {
        self.add_with_failures(block, results, 0);
    }

    pub fn add_with_failures(
        &self,
        block: ResultBlock,
        results: ResultBlockResults,
        failures: usize,
    ) {
        let height = block.block.header.height;
        self.heights.lock().unwrap().insert(
            height,
            ScriptedHeight {
                failures,
                block,
                results,
            },
        );
    }
}

#[async_trait]
impl ChainClient for FakeClient {
    async fn block(&self, height: i64) -> namx_rpc::Result<ResultBlock> {
        let mut heights = self.heights.lock().unwrap();
        match heights.get_mut(&height) {
            Some(entry) if entry.failures > 0 => {
                entry.failures -= 1;
                Err(RpcError::BlockNotFound)
            }
            Some(entry) => Ok(entry.block.clone()),
            None => Err(RpcError::BlockNotFound),
        }
    }

    async fn block_results(&self, height: i64) -> namx_rpc::Result<ResultBlockResults> {
        let heights = self.heights.lock().unwrap();
        heights
            .get(&height)
            .map(|entry| entry.results.clone())
            .ok_or(RpcError::BlockNotFound)
    }

    async fn latest_block(&self) -> namx_rpc::Result<ResultBlock> {
        self.block(self.tip).await
    }
}

/// Everything the fake store has committed.
#[derive(Default)]
pub struct StoreState {
    pub blocks: Vec<namx_store::Block>,
    pub transactions: Vec<Transaction>,
    pub account_transactions: Vec<AccountTransaction>,
    pub evidences: Vec<Evidence>,
    pub commit_signatures: Vec<CommitSignature>,
    pub indexes_created: bool,
}

/// Ops staged inside a fake transaction, applied on commit.
pub enum Op {
    Block(namx_store::Block),
    CommitSignatures(Vec<CommitSignature>),
    Evidences(Vec<Evidence>),
    Transactions(Vec<Transaction>),
    AccountTransactions(Vec<AccountTransaction>),
}

/// Fake store: staged operations become visible only on commit, and
/// any insert stage can be scripted to fail.
pub struct FakeStore {
    pub state: Arc<Mutex<StoreState>>,
    fail_stage: Option<&'static str>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            fail_stage: None,
        }
    }

    pub fn failing_at(stage: &'static str) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            fail_stage: Some(stage),
        }
    }

    fn check_stage(&self, stage: &'static str) -> namx_store::Result<()> {
        if self.fail_stage == Some(stage) {
            return Err(StoreError::Other(format!("injected failure at {stage}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FakeStore {
    type Tx = Vec<Op>;

    async fn begin(&self) -> namx_store::Result<Self::Tx> {
        Ok(Vec::new())
    }

    async fn commit(&self, tx: Self::Tx) -> namx_store::Result<()> {
        self.check_stage("commit")?;
        let mut state = self.state.lock().unwrap();
        for op in tx {
            match op {
                Op::Block(block) => state.blocks.push(block),
                Op::CommitSignatures(rows) => state.commit_signatures.extend(rows),
                Op::Evidences(rows) => state.evidences.extend(rows),
                Op::Transactions(rows) => state.transactions.extend(rows),
                Op::AccountTransactions(rows) => state.account_transactions.extend(rows),
            }
        }
        Ok(())
    }

    async fn insert_block(
        &self,
        tx: &mut Self::Tx,
        block: &namx_store::Block,
    ) -> namx_store::Result<()> {
        self.check_stage("block")?;
        tx.push(Op::Block(block.clone()));
        Ok(())
    }

    async fn insert_commit_signatures(
        &self,
        tx: &mut Self::Tx,
        signatures: &[CommitSignature],
    ) -> namx_store::Result<()> {
        self.check_stage("commit_signatures")?;
        tx.push(Op::CommitSignatures(signatures.to_vec()));
        Ok(())
    }

    async fn insert_evidences(
        &self,
        tx: &mut Self::Tx,
        evidences: &[Evidence],
    ) -> namx_store::Result<()> {
        self.check_stage("evidences")?;
        tx.push(Op::Evidences(evidences.to_vec()));
        Ok(())
    }

    async fn insert_transactions(
        &self,
        tx: &mut Self::Tx,
        txs: &[Transaction],
    ) -> namx_store::Result<()> {
        self.check_stage("transactions")?;
        tx.push(Op::Transactions(txs.to_vec()));
        Ok(())
    }

    async fn insert_account_transactions(
        &self,
        tx: &mut Self::Tx,
        txs: &[AccountTransaction],
    ) -> namx_store::Result<()> {
        self.check_stage("account_transactions")?;
        tx.push(Op::AccountTransactions(txs.to_vec()));
        Ok(())
    }

    async fn last_height(&self) -> namx_store::Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .blocks
            .iter()
            .map(|block| block.header_height)
            .max()
            .unwrap_or(0))
    }

    async fn has_indexes(&self) -> namx_store::Result<bool> {
        Ok(self.state.lock().unwrap().indexes_created)
    }

    async fn create_indexes(&self) -> namx_store::Result<()> {
        self.state.lock().unwrap().indexes_created = true;
        Ok(())
    }
}
