//! Transaction header and outer type

use namx_types::{Address, DenominatedAmount, Hash, PublicKey};

use crate::error::{DecodeError, Result};
use crate::wire::{Decode, Encode, Reader};

/// Fee terms of a wrapper transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    pub amount_per_gas_unit: DenominatedAmount,
    pub token: Address,
}

impl Decode for Fee {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            amount_per_gas_unit: DenominatedAmount::decode(r)?,
            token: Address::decode(r)?,
        })
    }
}

impl Encode for Fee {
    fn encode(&self, out: &mut Vec<u8>) {
        self.amount_per_gas_unit.encode(out);
        self.token.encode(out);
    }
}

/// The fee-paying envelope committed one block before its payload is
/// revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperTx {
    pub fee: Fee,
    pub pk: PublicKey,
    pub epoch: u64,
    pub gas_limit: u64,
    pub unshield_section_hash: Option<Hash>,
}

impl Decode for WrapperTx {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            fee: Fee::decode(r)?,
            pk: PublicKey::decode(r)?,
            epoch: u64::decode(r)?,
            gas_limit: u64::decode(r)?,
            unshield_section_hash: Option::<Hash>::decode(r)?,
        })
    }
}

impl Encode for WrapperTx {
    fn encode(&self, out: &mut Vec<u8>) {
        self.fee.encode(out);
        self.pk.encode(out);
        self.epoch.encode(out);
        self.gas_limit.encode(out);
        self.unshield_section_hash.encode(out);
    }
}

/// Outcome of revealing a wrapper's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptedTx {
    Decrypted,
    Undecryptable,
}

impl Decode for DecryptedTx {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => DecryptedTx::Decrypted,
            1 => DecryptedTx::Undecryptable,
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "DecryptedTx",
                    tag,
                })
            }
        })
    }
}

impl Encode for DecryptedTx {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(match self {
            DecryptedTx::Decrypted => 0,
            DecryptedTx::Undecryptable => 1,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolTxType {
    EthereumEvents,
    BridgePool,
    ValidatorSetUpdate,
    EthEventsVext,
    BridgePoolVext,
    ValSetUpdateVext,
}

impl Decode for ProtocolTxType {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => ProtocolTxType::EthereumEvents,
            1 => ProtocolTxType::BridgePool,
            2 => ProtocolTxType::ValidatorSetUpdate,
            3 => ProtocolTxType::EthEventsVext,
            4 => ProtocolTxType::BridgePoolVext,
            5 => ProtocolTxType::ValSetUpdateVext,
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "ProtocolTxType",
                    tag,
                })
            }
        })
    }
}

impl Encode for ProtocolTxType {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(match self {
            ProtocolTxType::EthereumEvents => 0,
            ProtocolTxType::BridgePool => 1,
            ProtocolTxType::ValidatorSetUpdate => 2,
            ProtocolTxType::EthEventsVext => 3,
            ProtocolTxType::BridgePoolVext => 4,
            ProtocolTxType::ValSetUpdateVext => 5,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolTx {
    pub pk: PublicKey,
    pub tx: ProtocolTxType,
}

impl Decode for ProtocolTx {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            pk: PublicKey::decode(r)?,
            tx: ProtocolTxType::decode(r)?,
        })
    }
}

impl Encode for ProtocolTx {
    fn encode(&self, out: &mut Vec<u8>) {
        self.pk.encode(out);
        self.tx.encode(out);
    }
}

/// The outer transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxType {
    Raw,
    Wrapper(Box<WrapperTx>),
    Decrypted(DecryptedTx),
    Protocol(ProtocolTx),
}

impl TxType {
    pub fn is_wrapper(&self) -> bool {
        matches!(self, TxType::Wrapper(_))
    }

    pub fn is_decrypted(&self) -> bool {
        matches!(self, TxType::Decrypted(_))
    }

    /// The stored `tx_type` string.
    pub fn kind(&self) -> &'static str {
        match self {
            TxType::Raw => "Raw",
            TxType::Wrapper(_) => "Wrapper",
            TxType::Decrypted(_) => "Decrypted",
            TxType::Protocol(_) => "Protocol",
        }
    }
}

impl Decode for TxType {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => TxType::Raw,
            1 => TxType::Wrapper(Box::new(WrapperTx::decode(r)?)),
            2 => TxType::Decrypted(DecryptedTx::decode(r)?),
            3 => TxType::Protocol(ProtocolTx::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "TxType",
                    tag,
                })
            }
        })
    }
}

impl Encode for TxType {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            TxType::Raw => out.push(0),
            TxType::Wrapper(wrapper) => {
                out.push(1);
                wrapper.encode(out);
            }
            TxType::Decrypted(decrypted) => {
                out.push(2);
                decrypted.encode(out);
            }
            TxType::Protocol(protocol) => {
                out.push(3);
                protocol.encode(out);
            }
        }
    }
}

/// Transaction header. Kept small and cheaply re-encodable: the
/// transaction identity hash re-encodes it with the tx type rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub chain_id: String,
    pub expiration: Option<String>,
    pub timestamp: String,
    pub code_hash: Hash,
    pub data_hash: Hash,
    pub memo_hash: Hash,
    pub tx_type: TxType,
}

impl Decode for Header {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            chain_id: String::decode(r)?,
            expiration: Option::<String>::decode(r)?,
            timestamp: String::decode(r)?,
            code_hash: Hash::decode(r)?,
            data_hash: Hash::decode(r)?,
            memo_hash: Hash::decode(r)?,
            tx_type: TxType::decode(r)?,
        })
    }
}

impl Encode for Header {
    fn encode(&self, out: &mut Vec<u8>) {
        self.chain_id.encode(out);
        self.expiration.encode(out);
        self.timestamp.encode(out);
        self.code_hash.encode(out);
        self.data_hash.encode(out);
        self.memo_hash.encode(out);
        self.tx_type.encode(out);
    }
}
