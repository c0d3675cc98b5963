//! Chain indexer
//!
//! Follows a consensus node block by block, decodes every transaction
//! and persists one atomic batch of rows per block. Two cooperating
//! tasks share a bounded channel: the [`fetcher`] walks heights in
//! strict ascending order and retries forever, the [`processor`]
//! consumes pairs in order and never retries — a decode or store
//! failure is fatal and shuts the process down, because skipping a
//! malformed block would leave a gap in the height sequence.

pub mod checksums;
pub mod config;
pub mod fetcher;
pub mod processor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("config: {0}")]
    Config(String),

    #[error("checksums: {0}")]
    Checksums(String),

    #[error("rpc: {0}")]
    Rpc(#[from] namx_rpc::Error),

    #[error("store: {0}")]
    Store(#[from] namx_store::StoreError),

    #[error("decode tx {pos} in block {height}: {source}")]
    DecodeTx {
        height: i64,
        pos: i64,
        #[source]
        source: namx_core::DecodeError,
    },

    #[error("process block {height}: {source}")]
    ProcessBlock {
        height: i64,
        #[source]
        source: Box<IndexerError>,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
