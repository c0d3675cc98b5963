//! Consensus-node RPC client
//!
//! This crate speaks the consensus engine's JSON-RPC-over-HTTP
//! surface: `block` and `block_results` at a height, plus the latest
//! block for tip discovery. The node signals a missing block with RPC
//! error code −32603, which maps to [`Error::BlockNotFound`]; every
//! other failure is transient from the indexer's point of view.

mod client;
mod error;
mod types;

pub use client::HttpClient;
pub use error::{Error, Result};
pub use types::{
    Base64Bytes, Block, BlockData, BlockId, Commit, CommitSig, DuplicateVoteEvidence, Event,
    EventAttribute, EvidenceEnvelope, EvidenceList, EvidenceVote, Header, HexBytes,
    PartSetHeader, ResultBlock, ResultBlockResults, Version, DUPLICATE_VOTE_EVIDENCE_TYPE,
};

use async_trait::async_trait;

/// The node operations the indexer depends on. Implemented by
/// [`HttpClient`] and by in-memory fakes in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn block(&self, height: i64) -> Result<ResultBlock>;

    async fn block_results(&self, height: i64) -> Result<ResultBlockResults>;

    /// The node's current tip.
    async fn latest_block(&self) -> Result<ResultBlock>;
}
