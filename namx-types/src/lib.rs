//! Domain types for the Namada-family chain
//!
//! This crate provides the primitive value types the indexer decodes
//! transactions into: hashes, amounts, addresses, keys and signatures,
//! each with its canonical string form (lowercase hex, decimal
//! rendering, bech32m).

pub mod address;
pub mod amount;
pub mod hash;
pub mod key;
pub mod map;

pub use address::{
    Address, EstablishedAddress, EthAddress, IbcTokenHash, ImplicitAddress, InternalAddress,
};
pub use amount::{Amount, Dec, DenominatedAmount, Uint};
pub use hash::{AddressHash, Hash};
pub use key::{
    Ed25519PublicKey, Ed25519Signature, PublicKey, Secp256k1PublicKey, Secp256k1Signature,
    Signature,
};
pub use map::OrderedMap;
