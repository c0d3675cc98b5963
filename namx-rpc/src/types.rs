//! RPC response models
//!
//! Shapes mirror the consensus engine's JSON conventions: 64-bit
//! integers arrive as decimal strings, hashes and addresses as hex
//! strings, transaction blobs and signatures as base64.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Amino-style type name of duplicate-vote evidence entries.
pub const DUPLICATE_VOTE_EVIDENCE_TYPE: &str = "tendermint/DuplicateVoteEvidence";

/// Bytes carried as a hex string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(&text)
            .map(HexBytes)
            .map_err(|e| D::Error::custom(format!("invalid hex string: {e}")))
    }
}

/// Bytes carried as standard base64.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Base64Bytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for Base64Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(&text)
            .map(Base64Bytes)
            .map_err(|e| D::Error::custom(format!("invalid base64 string: {e}")))
    }
}

/// 64-bit integers encoded as decimal strings.
pub(crate) mod string_i64 {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<i64, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse()
            .map_err(|e| D::Error::custom(format!("invalid integer string: {e}")))
    }
}

pub(crate) mod string_u64 {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<u64, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse()
            .map_err(|e| D::Error::custom(format!("invalid integer string: {e}")))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    pub hash: HexBytes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockId {
    pub hash: HexBytes,
    #[serde(default)]
    pub parts: PartSetHeader,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Version {
    #[serde(with = "string_u64")]
    pub block: u64,
    #[serde(with = "string_u64")]
    pub app: u64,
}

/// The consensus block header.
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub version: Version,
    pub chain_id: String,
    #[serde(with = "string_i64")]
    pub height: i64,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub last_block_id: BlockId,
    #[serde(default)]
    pub last_commit_hash: HexBytes,
    #[serde(default)]
    pub data_hash: HexBytes,
    #[serde(default)]
    pub validators_hash: HexBytes,
    #[serde(default)]
    pub next_validators_hash: HexBytes,
    #[serde(default)]
    pub consensus_hash: HexBytes,
    #[serde(default)]
    pub app_hash: HexBytes,
    #[serde(default)]
    pub last_results_hash: HexBytes,
    #[serde(default)]
    pub evidence_hash: HexBytes,
    #[serde(default)]
    pub proposer_address: HexBytes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockData {
    /// Raw transaction blobs in block order.
    #[serde(default)]
    pub txs: Vec<Base64Bytes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvidenceList {
    #[serde(default)]
    pub evidence: Vec<EvidenceEnvelope>,
}

/// One evidence entry: a type name plus an untyped value. Only
/// duplicate-vote evidence is interpreted; everything else is carried
/// opaquely and ignored by the processor.
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

impl EvidenceEnvelope {
    /// Parse the value when this is duplicate-vote evidence.
    pub fn as_duplicate_vote(&self) -> Result<Option<DuplicateVoteEvidence>> {
        if self.kind != DUPLICATE_VOTE_EVIDENCE_TYPE {
            return Ok(None);
        }
        serde_json::from_value(self.value.clone())
            .map(Some)
            .map_err(|e| Error::InvalidResponse(format!("duplicate vote evidence: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateVoteEvidence {
    pub vote_a: EvidenceVote,
    pub vote_b: EvidenceVote,
    #[serde(rename = "TotalVotingPower", with = "string_i64")]
    pub total_voting_power: i64,
    #[serde(rename = "ValidatorPower", with = "string_i64")]
    pub validator_power: i64,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceVote {
    #[serde(with = "string_i64")]
    pub height: i64,
    #[serde(default)]
    pub round: i32,
    pub timestamp: DateTime<Utc>,
    pub validator_address: HexBytes,
    #[serde(default)]
    pub validator_index: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSig {
    pub block_id_flag: i32,
    #[serde(default)]
    pub validator_address: HexBytes,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub signature: Option<Base64Bytes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    #[serde(with = "string_i64")]
    pub height: i64,
    pub round: i32,
    pub block_id: BlockId,
    #[serde(default)]
    pub signatures: Vec<CommitSig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub header: Header,
    #[serde(default)]
    pub data: BlockData,
    #[serde(default)]
    pub evidence: EvidenceList,
    #[serde(default)]
    pub last_commit: Option<Commit>,
}

/// Result of the `block` RPC.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultBlock {
    pub block_id: BlockId,
    pub block: Block,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub index: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

/// Result of the `block_results` RPC. Only the end-of-block events
/// matter here; they carry the per-tx return codes.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultBlockResults {
    #[serde(with = "string_i64")]
    pub height: i64,
    #[serde(default)]
    pub end_block_events: Option<Vec<Event>>,
}

impl ResultBlockResults {
    pub fn end_block_events(&self) -> &[Event] {
        self.end_block_events.as_deref().unwrap_or(&[])
    }
}
