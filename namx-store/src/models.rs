//! Persistence row shapes
//!
//! Field-for-field contracts with the store tables. Byte columns stay
//! raw; rendered string forms (addresses, amounts) are produced by
//! the decoder before rows are built.

use chrono::{DateTime, Utc};

/// One row per consensus block.
#[derive(Debug, Clone)]
pub struct Block {
    pub block_id: Vec<u8>,
    pub header_version_app: i64,
    pub header_version_block: i64,
    pub header_chain_id: String,
    pub header_height: i64,
    pub header_time: DateTime<Utc>,
    pub header_last_block_id_hash: Vec<u8>,
    pub header_last_block_id_parts_header_total: i64,
    pub header_last_block_id_parts_header_hash: Vec<u8>,
    pub header_last_commit_hash: Vec<u8>,
    pub header_data_hash: Vec<u8>,
    pub header_validators_hash: Vec<u8>,
    pub header_next_validators_hash: Vec<u8>,
    pub header_consensus_hash: Vec<u8>,
    pub header_app_hash: Vec<u8>,
    pub header_last_results_hash: Vec<u8>,
    pub header_evidence_hash: Vec<u8>,
    pub header_proposer_address: Vec<u8>,
    pub commit_height: i64,
    pub commit_round: i32,
    pub commit_block_id_hash: Vec<u8>,
    pub commit_block_id_parts_header_total: i64,
    pub commit_block_id_parts_header_hash: Vec<u8>,
}

/// One row per transaction; `(block_id, pos_in_block)` is unique.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub hash: Vec<u8>,
    pub block_id: Vec<u8>,
    pub tx_type: String,
    /// Hash of the wrapper at the same position in the previous
    /// block, when that block was processed in this run.
    pub wrapper_id: Option<Vec<u8>>,
    pub memo: String,
    pub fee_amount_per_gas_unit: String,
    pub fee_token: String,
    pub gas_limit_multiplier: Option<i64>,
    pub code: Option<Vec<u8>>,
    /// Decoded payload document; JSON null when the tx failed or
    /// carries no data section.
    pub data: serde_json::Value,
    pub return_code: Option<i64>,
    pub pos_in_block: i64,
}

/// One row per decoded payload with a designated primary address.
#[derive(Debug, Clone)]
pub struct AccountTransaction {
    pub address: String,
    pub tx_hash: Vec<u8>,
    pub block_height: i64,
    pub tx_pos: i64,
}

/// One row per duplicate-vote evidence entry.
#[derive(Debug, Clone)]
pub struct Evidence {
    pub block_id: Vec<u8>,
    pub height: i64,
    pub time: i64,
    pub address: Vec<u8>,
    pub total_voting_power: i64,
    pub validator_power: i64,
}

/// One row per last-commit signature entry.
#[derive(Debug, Clone)]
pub struct CommitSignature {
    pub block_id: Vec<u8>,
    pub block_id_flag: i32,
    pub validator_address: Vec<u8>,
    pub timestamp: i64,
    pub signature: Vec<u8>,
}
