//! Transaction decoding for the Namada-family chain
//!
//! # Modules
//!
//! - [`wire`] - The strict little-endian binary codec (decode + encode)
//! - [`tx`] - Transaction envelope, sections and content-addressed hashing
//! - [`masp`] - Shielded-transaction section shapes (framing only)
//! - [`payload`] - Typed inner payloads and the checksum dispatcher
//! - [`checksums`] - Code-hash to tx-type-name map

pub mod checksums;
pub mod error;
pub mod masp;
pub mod payload;
pub mod tx;
pub mod wire;

pub use checksums::Checksums;
pub use error::DecodeError;
pub use tx::{Header, Section, Tx, TxType};
