//! Typed inner payloads
//!
//! One struct per tx-type name the checksum dispatcher can resolve.
//! Each decodes from the data section's bytes and renders as the
//! canonical JSON document stored in the `data` column: amounts,
//! addresses, keys and decimals as strings, sum types as externally
//! tagged objects, optional fields omitted when absent.

mod dispatch;

pub use dispatch::{decode_payload, DecodedPayload};

use namx_types::{
    Address, Amount, Dec, DenominatedAmount, EthAddress, Hash, OrderedMap, PublicKey,
    Secp256k1PublicKey,
};
use serde::Serialize;

use crate::error::{DecodeError, Result};
use crate::wire::{Decode, Reader};

#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    pub source: Address,
    pub target: Address,
    pub token: Address,
    pub amount: DenominatedAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shielded: Option<Hash>,
}

impl Decode for Transfer {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            source: Address::decode(r)?,
            target: Address::decode(r)?,
            token: Address::decode(r)?,
            amount: DenominatedAmount::decode(r)?,
            key: Option::<String>::decode(r)?,
            shielded: Option::<Hash>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BecomeValidator {
    pub address: Address,
    pub consensus_key: PublicKey,
    pub eth_cold_key: Secp256k1PublicKey,
    pub eth_hot_key: Secp256k1PublicKey,
    pub protocol_key: PublicKey,
    pub commission_rate: Dec,
    pub max_commission_rate_change: Dec,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Decode for BecomeValidator {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            address: Address::decode(r)?,
            consensus_key: PublicKey::decode(r)?,
            eth_cold_key: decode_secp_key(r)?,
            eth_hot_key: decode_secp_key(r)?,
            protocol_key: PublicKey::decode(r)?,
            commission_rate: Dec::decode(r)?,
            max_commission_rate_change: Dec::decode(r)?,
            email: String::decode(r)?,
            description: Option::<String>::decode(r)?,
            website: Option::<String>::decode(r)?,
            discord_handle: Option::<String>::decode(r)?,
            avatar: Option::<String>::decode(r)?,
        })
    }
}

fn decode_secp_key(r: &mut Reader<'_>) -> Result<Secp256k1PublicKey> {
    Ok(Secp256k1PublicKey(r.array()?))
}

/// Bond and unbond share one shape.
#[derive(Debug, Clone, Serialize)]
pub struct Bond {
    pub validator: Address,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Address>,
}

impl Decode for Bond {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            validator: Address::decode(r)?,
            amount: Amount::decode(r)?,
            source: Option::<Address>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Withdraw {
    pub validator: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Address>,
}

impl Decode for Withdraw {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            validator: Address::decode(r)?,
            source: Option::<Address>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimRewards {
    pub validator: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Address>,
}

impl Decode for ClaimRewards {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            validator: Address::decode(r)?,
            source: Option::<Address>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Redelegation {
    pub src_validator: Address,
    pub dest_validator: Address,
    pub owner: Address,
    pub amount: Amount,
}

impl Decode for Redelegation {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            src_validator: Address::decode(r)?,
            dest_validator: Address::decode(r)?,
            owner: Address::decode(r)?,
            amount: Amount::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommissionChange {
    pub validator: Address,
    pub new_rate: Dec,
}

impl Decode for CommissionChange {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            validator: Address::decode(r)?,
            new_rate: Dec::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaDataChange {
    pub validator: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<Dec>,
}

impl Decode for MetaDataChange {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            validator: Address::decode(r)?,
            email: Option::<String>::decode(r)?,
            description: Option::<String>::decode(r)?,
            website: Option::<String>::decode(r)?,
            discord_handle: Option::<String>::decode(r)?,
            avatar: Option::<String>::decode(r)?,
            commission_rate: Option::<Dec>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsensusKeyChange {
    pub validator: Address,
    pub consensus_key: PublicKey,
}

impl Decode for ConsensusKeyChange {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            validator: Address::decode(r)?,
            consensus_key: PublicKey::decode(r)?,
        })
    }
}

/// An addition or removal inside a governance proposal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddRemove<T> {
    Add(T),
    Remove(T),
}

impl<T: Decode> Decode for AddRemove<T> {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => AddRemove::Add(T::decode(r)?),
            1 => AddRemove::Remove(T::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "AddRemove",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PgfInternalTarget {
    pub target: Address,
    pub amount: Amount,
}

impl Decode for PgfInternalTarget {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            target: Address::decode(r)?,
            amount: Amount::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PgfIbcTarget {
    pub target: String,
    pub amount: Amount,
    pub port_id: String,
    pub channel_id: String,
}

impl Decode for PgfIbcTarget {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            target: String::decode(r)?,
            amount: Amount::decode(r)?,
            port_id: String::decode(r)?,
            channel_id: String::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum PgfTarget {
    Internal(PgfInternalTarget),
    Ibc(PgfIbcTarget),
}

impl Decode for PgfTarget {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => PgfTarget::Internal(PgfInternalTarget::decode(r)?),
            1 => PgfTarget::Ibc(PgfIbcTarget::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "PgfTarget",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum PgfAction {
    Continuous(AddRemove<PgfTarget>),
    Retro(PgfTarget),
}

impl Decode for PgfAction {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => PgfAction::Continuous(AddRemove::<PgfTarget>::decode(r)?),
            1 => PgfAction::Retro(PgfTarget::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "PgfAction",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ProposalType {
    Default(Option<Hash>),
    #[serde(rename = "PGFSteward")]
    PgfSteward(Vec<AddRemove<Address>>),
    #[serde(rename = "PGFPayment")]
    PgfPayment(Vec<PgfAction>),
}

impl Decode for ProposalType {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => ProposalType::Default(Option::<Hash>::decode(r)?),
            1 => ProposalType::PgfSteward(Vec::<AddRemove<Address>>::decode(r)?),
            2 => ProposalType::PgfPayment(Vec::<PgfAction>::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "ProposalType",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitProposalData {
    pub id: u64,
    pub content: Hash,
    pub author: Address,
    #[serde(rename = "type")]
    pub kind: ProposalType,
    pub voting_start_epoch: u64,
    pub voting_end_epoch: u64,
    pub grace_epoch: u64,
}

impl Decode for InitProposalData {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            id: u64::decode(r)?,
            content: Hash::decode(r)?,
            author: Address::decode(r)?,
            kind: ProposalType::decode(r)?,
            voting_start_epoch: u64::decode(r)?,
            voting_end_epoch: u64::decode(r)?,
            grace_epoch: u64::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum ProposalVote {
    Yay,
    Nay,
    Abstain,
}

impl Decode for ProposalVote {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => ProposalVote::Yay,
            1 => ProposalVote::Nay,
            2 => ProposalVote::Abstain,
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "ProposalVote",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteProposalData {
    pub id: u64,
    pub vote: ProposalVote,
    pub voter: Address,
    pub delegations: Vec<Address>,
}

impl Decode for VoteProposalData {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            id: u64::decode(r)?,
            vote: ProposalVote::decode(r)?,
            voter: Address::decode(r)?,
            delegations: Vec::<Address>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevealPk(pub PublicKey);

impl Decode for RevealPk {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self(PublicKey::decode(r)?))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResignSteward(pub Address);

impl Decode for ResignSteward {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self(Address::decode(r)?))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStewardCommission {
    pub steward: Address,
    pub commission: OrderedMap<Address, Dec>,
}

impl Decode for UpdateStewardCommission {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            steward: Address::decode(r)?,
            commission: OrderedMap::<Address, Dec>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitAccount {
    pub public_keys: Vec<PublicKey>,
    pub vp_code_hash: Hash,
    pub threshold: u8,
}

impl Decode for InitAccount {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            public_keys: Vec::<PublicKey>::decode(r)?,
            vp_code_hash: Hash::decode(r)?,
            threshold: u8::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAccount {
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vp_code_hash: Option<Hash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub public_keys: Vec<PublicKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,
}

impl Decode for UpdateAccount {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            address: Address::decode(r)?,
            vp_code_hash: Option::<Hash>::decode(r)?,
            public_keys: Vec::<PublicKey>::decode(r)?,
            threshold: Option::<u8>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum TransferToEthereumKind {
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "NUT")]
    Nut,
}

impl Decode for TransferToEthereumKind {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => TransferToEthereumKind::Erc20,
            1 => TransferToEthereumKind::Nut,
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "TransferToEthereumKind",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferToEthereum {
    pub kind: TransferToEthereumKind,
    pub asset: EthAddress,
    pub recipient: EthAddress,
    pub sender: Address,
    pub amount: Amount,
}

impl Decode for TransferToEthereum {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            kind: TransferToEthereumKind::decode(r)?,
            asset: EthAddress::decode(r)?,
            recipient: EthAddress::decode(r)?,
            sender: Address::decode(r)?,
            amount: Amount::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GasFee {
    pub amount: Amount,
    pub payer: Address,
    pub token: Address,
}

impl Decode for GasFee {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            amount: Amount::decode(r)?,
            payer: Address::decode(r)?,
            token: Address::decode(r)?,
        })
    }
}

/// A transfer queued for the Ethereum bridge pool.
#[derive(Debug, Clone, Serialize)]
pub struct PendingTransfer {
    pub transfer: TransferToEthereum,
    pub gas_fee: GasFee,
}

impl Decode for PendingTransfer {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            transfer: TransferToEthereum::decode(r)?,
            gas_fee: GasFee::decode(r)?,
        })
    }
}
