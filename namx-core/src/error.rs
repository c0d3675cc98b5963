//! Error types for transaction decoding

use thiserror::Error;

/// Binary decode failure. No partial value is ever returned alongside
/// one of these.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at byte {at}, needed {needed} more")]
    UnexpectedEof { at: usize, needed: usize },

    #[error("unknown tag {tag} for {what}")]
    UnknownTag { what: &'static str, tag: u8 },

    #[error("declared length {declared} exceeds the {remaining} remaining bytes")]
    Length { declared: usize, remaining: usize },

    #[error("{len} trailing bytes left after decoding")]
    TrailingBytes { len: usize },

    #[error("invalid utf-8 in string field")]
    Utf8,

    #[error("outer envelope: {0}")]
    Envelope(#[from] prost::DecodeError),

    #[error("payload json rendering: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
