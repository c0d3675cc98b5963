//! Error types for the RPC crate

use thiserror::Error;

/// RPC error code the node uses for a block that does not exist yet.
pub const BLOCK_NOT_FOUND_CODE: i64 = -32603;

#[derive(Debug, Error)]
pub enum Error {
    #[error("block not found")]
    BlockNotFound,

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected rpc response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Map a JSON-RPC error object to the domain error.
    pub fn from_rpc(code: i64, message: String) -> Self {
        if code == BLOCK_NOT_FOUND_CODE {
            Error::BlockNotFound
        } else {
            Error::Rpc { code, message }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
