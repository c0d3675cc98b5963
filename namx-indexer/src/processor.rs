//! Block processor
//!
//! Single consumer of the fetched stream. Each pair becomes one
//! atomic store transaction: the block row, commit signatures,
//! duplicate-vote evidences, transaction rows and account rows either
//! all land or none do. The processor keeps the previous block's
//! transaction hashes in memory to link each decrypted transaction to
//! the wrapper at the same position one block earlier; the register
//! deliberately forgets on restart, so the first block of a run never
//! carries wrapper links.

use std::sync::Arc;

use namx_core::payload::decode_payload;
use namx_core::tx::Section;
use namx_core::{Checksums, Tx};
use namx_rpc::{ChainClient, ResultBlock, ResultBlockResults};
use namx_store::{AccountTransaction, Block, CommitSignature, Evidence, Store, Transaction};
use namx_types::Hash;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use crate::fetcher::BlockPair;
use crate::{IndexerError, Result};

/// The most recently persisted block's height and transaction hashes,
/// in position order.
struct PreviousBlock {
    height: i64,
    tx_hashes: Vec<Vec<u8>>,
}

pub struct Processor<C, S> {
    client: Arc<C>,
    store: S,
    checksums: Checksums,
    input: mpsc::Receiver<BlockPair>,
    shutdown: watch::Receiver<bool>,
    last_block: Option<PreviousBlock>,
}

impl<C: ChainClient, S: Store> Processor<C, S> {
    pub fn new(
        client: Arc<C>,
        store: S,
        checksums: Checksums,
        input: mpsc::Receiver<BlockPair>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            store,
            checksums,
            input,
            shutdown,
            last_block: None,
        }
    }

    /// Consume pairs until cancelled or the channel closes. Any
    /// processing error aborts: heights must stay dense, so a block
    /// that cannot be persisted cannot be skipped.
    pub async fn run(mut self) -> Result<()> {
        let tip_height = self.client.latest_block().await?.block.header.height;
        tracing::info!(tip_height, "latest block height on start");

        let mut has_indexes = self.store.has_indexes().await?;

        loop {
            let pair = tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::info!("stopping block processor");
                    return Ok(());
                }
                pair = self.input.recv() => match pair {
                    Some(pair) => pair,
                    None => {
                        tracing::info!("block stream closed, stopping processor");
                        return Ok(());
                    }
                },
            };

            let height = pair.block.block.header.height;
            tracing::info!(height, "processing block");

            self.process_block(pair)
                .await
                .map_err(|source| IndexerError::ProcessBlock {
                    height,
                    source: Box::new(source),
                })?;

            tracing::info!(height, "block saved");

            if height == tip_height && !has_indexes {
                tracing::info!("indexer synced");
                self.store.create_indexes().await?;
                has_indexes = true;
                tracing::info!("database indexes created");
            }
        }
    }

    async fn process_block(&mut self, pair: BlockPair) -> Result<()> {
        let BlockPair { block, results } = pair;
        let height = block.block.header.height;
        let block_id = block.block_id.hash.0.clone();

        let block_row = build_block_row(&block);
        let commit_signatures = commit_signature_rows(&block_id, &block);
        let evidences = evidence_rows(&block_id, &block)?;

        let mut txs = Vec::with_capacity(block.block.data.txs.len());
        let mut account_txs = Vec::new();
        let mut decrypted_id = 0usize;

        for (pos, raw) in block.block.data.txs.iter().enumerate() {
            let (tx_row, account_tx) =
                self.process_tx(&block_id, height, pos as i64, &mut decrypted_id, &raw.0, &results)?;
            txs.push(tx_row);
            account_txs.extend(account_tx);
        }

        let mut store_tx = self.store.begin().await?;
        self.store.insert_block(&mut store_tx, &block_row).await?;
        self.store
            .insert_commit_signatures(&mut store_tx, &commit_signatures)
            .await?;
        self.store.insert_evidences(&mut store_tx, &evidences).await?;
        self.store.insert_transactions(&mut store_tx, &txs).await?;
        self.store
            .insert_account_transactions(&mut store_tx, &account_txs)
            .await?;
        self.store.commit(store_tx).await?;

        self.last_block = Some(PreviousBlock {
            height,
            tx_hashes: txs.iter().map(|tx| tx.hash.clone()).collect(),
        });

        Ok(())
    }

    fn process_tx(
        &self,
        block_id: &[u8],
        height: i64,
        pos: i64,
        decrypted_id: &mut usize,
        raw: &[u8],
        results: &ResultBlockResults,
    ) -> Result<(Transaction, Option<AccountTransaction>)> {
        let tx = Tx::from_raw(raw).map_err(|source| IndexerError::DecodeTx {
            height,
            pos,
            source,
        })?;
        let tx_hash = tx.hash();

        tracing::debug!(height, pos, hash = %tx_hash, tx_type = tx.kind(), "decoded tx");

        let mut wrapper_id = None;
        let mut fee_amount_per_gas_unit = String::new();
        let mut fee_token = String::new();
        let mut gas_limit_multiplier = None;
        let mut code = None;
        let mut return_code = None;
        let mut data = Value::Null;
        let mut account_tx = None;

        if tx.header.tx_type.is_decrypted() {
            // The chain commits each wrapper in block N and reveals it
            // at the same decrypted position in block N+1.
            if let Some(prev) = &self.last_block {
                if prev.height == height - 1 && *decrypted_id < prev.tx_hashes.len() {
                    wrapper_id = Some(prev.tx_hashes[*decrypted_id].clone());
                }
            }
            *decrypted_id += 1;

            let code_hash = tx.code_hash();
            if !code_hash.is_zero() {
                code = Some(code_hash.0.to_vec());
            }

            let tx_type_name = self.checksums.lookup(&code_hash).unwrap_or("undefined");
            let tx_return_code = find_tx_return_code(&tx_hash, results);
            return_code = Some(tx_return_code);

            tracing::debug!(height, pos, tx_type_name, tx_return_code, "decrypted tx");

            if tx_return_code == 0 {
                if let Some(Section::Data(section)) = tx.get_section(tx.header.data_hash) {
                    let decoded = decode_payload(tx_type_name, &section.data).map_err(|source| {
                        IndexerError::DecodeTx {
                            height,
                            pos,
                            source,
                        }
                    })?;
                    data = decoded.data;
                    account_tx = decoded.primary_address.map(|address| AccountTransaction {
                        address: address.to_string(),
                        tx_hash: tx_hash.0.to_vec(),
                        block_height: height,
                        tx_pos: pos,
                    });
                }
            }
        } else if let namx_core::TxType::Wrapper(wrapper) = &tx.header.tx_type {
            fee_amount_per_gas_unit = wrapper.fee.amount_per_gas_unit.to_string();
            fee_token = wrapper.fee.token.to_string();
            gas_limit_multiplier = Some(wrapper.gas_limit as i64);
        }

        let row = Transaction {
            hash: tx_hash.0.to_vec(),
            block_id: block_id.to_vec(),
            tx_type: tx.kind().to_string(),
            wrapper_id,
            memo: tx.memo(),
            fee_amount_per_gas_unit,
            fee_token,
            gas_limit_multiplier,
            code,
            data,
            return_code,
            pos_in_block: pos,
        };
        Ok((row, account_tx))
    }
}

fn build_block_row(block: &ResultBlock) -> Block {
    let header = &block.block.header;
    let (commit_height, commit_round, commit_block_id_hash, commit_parts_total, commit_parts_hash) =
        match &block.block.last_commit {
            Some(commit) => (
                commit.height,
                commit.round,
                commit.block_id.hash.0.clone(),
                commit.block_id.parts.total as i64,
                commit.block_id.parts.hash.0.clone(),
            ),
            None => (0, 0, Vec::new(), 0, Vec::new()),
        };

    Block {
        block_id: block.block_id.hash.0.clone(),
        header_version_app: header.version.app as i64,
        header_version_block: header.version.block as i64,
        header_chain_id: header.chain_id.clone(),
        header_height: header.height,
        header_time: header.time,
        header_last_block_id_hash: header.last_block_id.hash.0.clone(),
        header_last_block_id_parts_header_total: header.last_block_id.parts.total as i64,
        header_last_block_id_parts_header_hash: header.last_block_id.parts.hash.0.clone(),
        header_last_commit_hash: header.last_commit_hash.0.clone(),
        header_data_hash: header.data_hash.0.clone(),
        header_validators_hash: header.validators_hash.0.clone(),
        header_next_validators_hash: header.next_validators_hash.0.clone(),
        header_consensus_hash: header.consensus_hash.0.clone(),
        header_app_hash: header.app_hash.0.clone(),
        header_last_results_hash: header.last_results_hash.0.clone(),
        header_evidence_hash: header.evidence_hash.0.clone(),
        header_proposer_address: header.proposer_address.0.clone(),
        commit_height,
        commit_round,
        commit_block_id_hash,
        commit_block_id_parts_header_total: commit_parts_total,
        commit_block_id_parts_header_hash: commit_parts_hash,
    }
}

fn commit_signature_rows(block_id: &[u8], block: &ResultBlock) -> Vec<CommitSignature> {
    let Some(commit) = &block.block.last_commit else {
        return Vec::new();
    };
    commit
        .signatures
        .iter()
        .map(|signature| CommitSignature {
            block_id: block_id.to_vec(),
            block_id_flag: signature.block_id_flag,
            validator_address: signature.validator_address.0.clone(),
            timestamp: signature.timestamp.timestamp(),
            signature: signature
                .signature
                .as_ref()
                .map(|s| s.0.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Evidence rows come from duplicate-vote evidence only; every other
/// evidence kind is ignored.
fn evidence_rows(block_id: &[u8], block: &ResultBlock) -> Result<Vec<Evidence>> {
    let mut rows = Vec::new();
    for envelope in &block.block.evidence.evidence {
        if let Some(duplicate) = envelope.as_duplicate_vote()? {
            rows.push(Evidence {
                block_id: block_id.to_vec(),
                height: duplicate.vote_a.height,
                time: duplicate.vote_a.timestamp.timestamp(),
                address: duplicate.vote_a.validator_address.0.clone(),
                total_voting_power: duplicate.total_voting_power,
                validator_power: duplicate.validator_power,
            });
        }
    }
    Ok(rows)
}

/// Scan the end-block events for the event carrying this tx hash and
/// read its `code` attribute. Missing event or unparseable code maps
/// to −1.
fn find_tx_return_code(tx_hash: &Hash, results: &ResultBlockResults) -> i64 {
    let wanted = tx_hash.to_string().to_uppercase();
    for event in results.end_block_events() {
        let matches = event
            .attributes
            .iter()
            .any(|attr| attr.key == "hash" && attr.value == wanted);
        if !matches {
            continue;
        }
        for attr in &event.attributes {
            if attr.key == "code" {
                return attr.value.parse().unwrap_or(-1);
            }
        }
    }
    -1
}
