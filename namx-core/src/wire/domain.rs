//! Wire layouts for the domain types

use namx_types::{
    Address, AddressHash, Amount, Dec, DenominatedAmount, Ed25519PublicKey, Ed25519Signature,
    EstablishedAddress, EthAddress, Hash, IbcTokenHash, ImplicitAddress, InternalAddress,
    PublicKey, Secp256k1PublicKey, Secp256k1Signature, Signature, Uint,
};

use super::{Decode, Encode, Reader};
use crate::error::{DecodeError, Result};

impl Decode for Hash {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Hash(r.array()?))
    }
}

impl Encode for Hash {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

impl Decode for AddressHash {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(AddressHash(r.array()?))
    }
}

impl Encode for AddressHash {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

impl Decode for Uint {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let mut limbs = [0u64; 4];
        for limb in &mut limbs {
            *limb = u64::decode(r)?;
        }
        Ok(Uint(limbs))
    }
}

impl Encode for Uint {
    fn encode(&self, out: &mut Vec<u8>) {
        for limb in &self.0 {
            limb.encode(out);
        }
    }
}

impl Decode for Amount {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Amount(Uint::decode(r)?))
    }
}

impl Encode for Amount {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl Decode for DenominatedAmount {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(DenominatedAmount {
            amount: Amount::decode(r)?,
            denom: u8::decode(r)?,
        })
    }
}

impl Encode for DenominatedAmount {
    fn encode(&self, out: &mut Vec<u8>) {
        self.amount.encode(out);
        self.denom.encode(out);
    }
}

impl Decode for Dec {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Dec(Uint::decode(r)?))
    }
}

impl Encode for Dec {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl Decode for EthAddress {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(EthAddress(r.array()?))
    }
}

impl Encode for EthAddress {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

impl Decode for InternalAddress {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => InternalAddress::PoS,
            1 => InternalAddress::PosSlashPool,
            2 => InternalAddress::Parameters,
            3 => InternalAddress::Ibc,
            4 => InternalAddress::IbcToken(IbcTokenHash(AddressHash::decode(r)?)),
            5 => InternalAddress::Governance,
            6 => InternalAddress::EthBridge,
            7 => InternalAddress::EthBridgePool,
            8 => InternalAddress::Erc20(EthAddress::decode(r)?),
            9 => InternalAddress::Nut(EthAddress::decode(r)?),
            10 => InternalAddress::Multitoken,
            11 => InternalAddress::Pgf,
            12 => InternalAddress::Masp,
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "InternalAddress",
                    tag,
                })
            }
        })
    }
}

impl Encode for InternalAddress {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            InternalAddress::PoS => out.push(0),
            InternalAddress::PosSlashPool => out.push(1),
            InternalAddress::Parameters => out.push(2),
            InternalAddress::Ibc => out.push(3),
            InternalAddress::IbcToken(token) => {
                out.push(4);
                token.0.encode(out);
            }
            InternalAddress::Governance => out.push(5),
            InternalAddress::EthBridge => out.push(6),
            InternalAddress::EthBridgePool => out.push(7),
            InternalAddress::Erc20(eth) => {
                out.push(8);
                eth.encode(out);
            }
            InternalAddress::Nut(eth) => {
                out.push(9);
                eth.encode(out);
            }
            InternalAddress::Multitoken => out.push(10),
            InternalAddress::Pgf => out.push(11),
            InternalAddress::Masp => out.push(12),
        }
    }
}

impl Decode for Address {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => Address::Established(EstablishedAddress {
                hash: AddressHash::decode(r)?,
            }),
            1 => Address::Implicit(ImplicitAddress(AddressHash::decode(r)?)),
            2 => Address::Internal(InternalAddress::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "Address",
                    tag,
                })
            }
        })
    }
}

impl Encode for Address {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Address::Established(addr) => {
                out.push(0);
                addr.hash.encode(out);
            }
            Address::Implicit(addr) => {
                out.push(1);
                addr.0.encode(out);
            }
            Address::Internal(addr) => {
                out.push(2);
                addr.encode(out);
            }
        }
    }
}

impl Decode for PublicKey {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => PublicKey::Ed25519(Ed25519PublicKey(r.array()?)),
            1 => PublicKey::Secp256k1(Secp256k1PublicKey(r.array()?)),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "PublicKey",
                    tag,
                })
            }
        })
    }
}

impl Encode for PublicKey {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.tagged_bytes());
    }
}

impl Decode for Signature {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => Signature::Ed25519(Ed25519Signature(r.array()?)),
            1 => Signature::Secp256k1(Secp256k1Signature(r.array()?)),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "Signature",
                    tag,
                })
            }
        })
    }
}

impl Encode for Signature {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.tagged_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Decode;

    #[test]
    fn address_variants_round_trip() {
        let addresses = [
            Address::Established(EstablishedAddress {
                hash: AddressHash([1u8; 20]),
            }),
            Address::Implicit(ImplicitAddress(AddressHash([2u8; 20]))),
            Address::Internal(InternalAddress::Governance),
            Address::Internal(InternalAddress::Erc20(EthAddress([3u8; 20]))),
        ];
        for address in addresses {
            let bytes = address.to_bytes();
            assert_eq!(Address::decode_all(&bytes).unwrap(), address);
        }
    }

    #[test]
    fn unknown_address_tag_is_an_error() {
        assert!(matches!(
            Address::decode_all(&[3]),
            Err(DecodeError::UnknownTag { what: "Address", .. })
        ));
    }

    #[test]
    fn uint_limbs_decode_least_significant_first() {
        let mut bytes = vec![0u8; 32];
        bytes[0] = 7;
        let value = Uint::decode_all(&bytes).unwrap();
        assert_eq!(value, Uint([7, 0, 0, 0]));
    }

    #[test]
    fn public_key_wire_form_matches_tagged_bytes() {
        let key = PublicKey::Secp256k1(Secp256k1PublicKey([9u8; 33]));
        assert_eq!(key.to_bytes(), key.tagged_bytes());
        assert_eq!(PublicKey::decode_all(&key.to_bytes()).unwrap(), key);
    }
}
