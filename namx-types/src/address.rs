//! Chain addresses
//!
//! Three address families share one canonical form: bech32m with HRP
//! `tnam` over a 21-byte payload of discriminant byte followed by the
//! 20 address bytes. Internal addresses without a hash payload use a
//! zeroed 20-byte payload.

use std::fmt;

use bech32::{Bech32m, Hrp};
use serde::{Serialize, Serializer};

use crate::hash::AddressHash;

const ADDRESS_HRP: &str = "tnam";

// Discriminant byte per address variant in the 21-byte payload.
pub const DISCRIMINANT_IMPLICIT: u8 = 0;
pub const DISCRIMINANT_ESTABLISHED: u8 = 1;
pub const DISCRIMINANT_POS: u8 = 2;
pub const DISCRIMINANT_SLASH_POOL: u8 = 3;
pub const DISCRIMINANT_PARAMETERS: u8 = 4;
pub const DISCRIMINANT_GOVERNANCE: u8 = 5;
pub const DISCRIMINANT_IBC: u8 = 6;
pub const DISCRIMINANT_ETH_BRIDGE: u8 = 7;
pub const DISCRIMINANT_BRIDGE_POOL: u8 = 8;
pub const DISCRIMINANT_MULTITOKEN: u8 = 9;
pub const DISCRIMINANT_PGF: u8 = 10;
pub const DISCRIMINANT_ERC20: u8 = 11;
pub const DISCRIMINANT_NUT: u8 = 12;
pub const DISCRIMINANT_IBC_TOKEN: u8 = 13;
pub const DISCRIMINANT_MASP: u8 = 14;

/// Encode a discriminant plus 20 address bytes as a `tnam` string.
fn encode_tnam(discriminant: u8, address: &AddressHash) -> String {
    let hrp = Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
    let mut payload = [0u8; 21];
    payload[0] = discriminant;
    payload[1..].copy_from_slice(&address.0);
    bech32::encode::<Bech32m>(hrp, &payload)
        .expect("encoding a 21-byte payload should never fail")
}

/// An address created on chain, identified by its state hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstablishedAddress {
    pub hash: AddressHash,
}

impl fmt::Display for EstablishedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_tnam(DISCRIMINANT_ESTABLISHED, &self.hash))
    }
}

/// An address derived from a public key hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitAddress(pub AddressHash);

impl fmt::Display for ImplicitAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_tnam(DISCRIMINANT_IMPLICIT, &self.0))
    }
}

/// Hash identifying an IBC token, rendered as plain hex outside of
/// its address form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IbcTokenHash(pub AddressHash);

impl fmt::Display for IbcTokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0 .0))
    }
}

/// A 20-byte Ethereum address, rendered `0x`-prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthAddress(pub [u8; 20]);

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Module addresses owned by the protocol itself.
///
/// The wire-tag order below is the storage order and intentionally
/// differs from the discriminant values used in the bech32m payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalAddress {
    PoS,
    PosSlashPool,
    Parameters,
    Ibc,
    IbcToken(IbcTokenHash),
    Governance,
    EthBridge,
    EthBridgePool,
    Erc20(EthAddress),
    Nut(EthAddress),
    Multitoken,
    Pgf,
    Masp,
}

impl fmt::Display for InternalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (discriminant, hash) = match self {
            InternalAddress::PoS => (DISCRIMINANT_POS, AddressHash::ZERO),
            InternalAddress::PosSlashPool => (DISCRIMINANT_SLASH_POOL, AddressHash::ZERO),
            InternalAddress::Parameters => (DISCRIMINANT_PARAMETERS, AddressHash::ZERO),
            InternalAddress::Ibc => (DISCRIMINANT_IBC, AddressHash::ZERO),
            InternalAddress::IbcToken(token) => (DISCRIMINANT_IBC_TOKEN, token.0),
            InternalAddress::Governance => (DISCRIMINANT_GOVERNANCE, AddressHash::ZERO),
            InternalAddress::EthBridge => (DISCRIMINANT_ETH_BRIDGE, AddressHash::ZERO),
            InternalAddress::EthBridgePool => (DISCRIMINANT_BRIDGE_POOL, AddressHash::ZERO),
            InternalAddress::Erc20(eth) => (DISCRIMINANT_ERC20, AddressHash(eth.0)),
            InternalAddress::Nut(eth) => (DISCRIMINANT_NUT, AddressHash(eth.0)),
            InternalAddress::Multitoken => (DISCRIMINANT_MULTITOKEN, AddressHash::ZERO),
            InternalAddress::Pgf => (DISCRIMINANT_PGF, AddressHash::ZERO),
            InternalAddress::Masp => (DISCRIMINANT_MASP, AddressHash::ZERO),
        };
        f.write_str(&encode_tnam(discriminant, &hash))
    }
}

/// Any chain address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Established(EstablishedAddress),
    Implicit(ImplicitAddress),
    Internal(InternalAddress),
}

impl Address {
    pub fn is_internal(&self) -> bool {
        matches!(self, Address::Internal(_))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Established(addr) => addr.fmt(f),
            Address::Implicit(addr) => addr.fmt(f),
            Address::Internal(addr) => addr.fmt(f),
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tnam_payload_round_trips_through_bech32() {
        let address = Address::Established(EstablishedAddress {
            hash: AddressHash([7u8; 20]),
        });
        let encoded = address.to_string();
        assert!(encoded.starts_with("tnam1"));

        let (hrp, payload) = bech32::decode(&encoded).unwrap();
        assert_eq!(hrp.as_str(), "tnam");
        assert_eq!(payload.len(), 21);
        assert_eq!(payload[0], DISCRIMINANT_ESTABLISHED);
        assert_eq!(&payload[1..], &[7u8; 20]);
    }

    #[test]
    fn internal_addresses_without_hash_use_zero_payload() {
        let encoded = Address::Internal(InternalAddress::Governance).to_string();
        let (_, payload) = bech32::decode(&encoded).unwrap();
        assert_eq!(payload[0], DISCRIMINANT_GOVERNANCE);
        assert_eq!(&payload[1..], &[0u8; 20]);
    }

    #[test]
    fn implicit_and_established_differ_only_in_discriminant() {
        let hash = AddressHash([9u8; 20]);
        let implicit = Address::Implicit(ImplicitAddress(hash)).to_string();
        let established = Address::Established(EstablishedAddress { hash }).to_string();
        assert_ne!(implicit, established);

        let (_, a) = bech32::decode(&implicit).unwrap();
        let (_, b) = bech32::decode(&established).unwrap();
        assert_eq!(a[1..], b[1..]);
        assert_eq!(a[0], DISCRIMINANT_IMPLICIT);
        assert_eq!(b[0], DISCRIMINANT_ESTABLISHED);
    }
}
