//! Shielded-transaction section shapes
//!
//! The indexer never replays shielded cryptography; these types exist
//! so the decoder can walk over MASP sections and leave the reader at
//! the right position. Proofs, signatures and descriptions are
//! consumed as opaque fixed-length blobs sized from their counters.
//!
//! The framing deviates from the default wire rules in one way: MASP
//! sequence counts use the compact-size prefix (a flag byte below 253
//! is the value itself; 253, 254, 255 select a little-endian u16, u32
//! or u64).

use namx_types::{Address, Hash, OrderedMap};

use crate::error::{DecodeError, Result};
use crate::wire::{Decode, Reader};

const SPEND_DESCRIPTION_V5_LEN: usize = 32 + 32 + 32;
const CONVERT_DESCRIPTION_V5_LEN: usize = 32;
const OUTPUT_DESCRIPTION_V5_LEN: usize = 32 + 32 + 32 + 580 + 32 + 80;

const ASSET_TYPE_LEN: usize = 32;
const I128_SUM_ENTRY_LEN: usize = ASSET_TYPE_LEN + 16;
const ZK_PROOF_LEN: usize = 48 + 96 + 48;
const SPEND_AUTH_SIG_LEN: usize = 64;
const BINDING_SIG_LEN: usize = 64;

/// Read a compact-size count: 1-byte inline value, or a 253/254/255
/// flag followed by a LE u16/u32/u64.
pub fn read_compact_size(r: &mut Reader<'_>) -> Result<usize> {
    let flag = r.byte()?;
    Ok(match flag {
        0..=252 => flag as usize,
        253 => u16::decode(r)? as usize,
        254 => u32::decode(r)? as usize,
        255 => usize::try_from(u64::decode(r)?).map_err(|_| DecodeError::Length {
            declared: usize::MAX,
            remaining: r.remaining(),
        })?,
    })
}

/// Consume `count` opaque blobs of `len` bytes each.
fn skip_blobs(r: &mut Reader<'_>, count: usize, len: usize) -> Result<()> {
    let total = count.checked_mul(len).ok_or(DecodeError::Length {
        declared: usize::MAX,
        remaining: r.remaining(),
    })?;
    r.take(total)?;
    Ok(())
}

/// A compact-size-counted run of (asset type, i128) entries.
fn skip_i128_sum(r: &mut Reader<'_>) -> Result<()> {
    let count = read_compact_size(r)?;
    skip_blobs(r, count, I128_SUM_ENTRY_LEN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxVersion {
    pub header: u32,
    pub version_group_id: u32,
}

impl Decode for TxVersion {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: u32::decode(r)?,
            version_group_id: u32::decode(r)?,
        })
    }
}

/// A transparent input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxInOut {
    pub asset_type: [u8; 32],
    pub value: u64,
    pub address: [u8; 20],
}

impl Decode for TxInOut {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            asset_type: r.array()?,
            value: u64::decode(r)?,
            address: r.array()?,
        })
    }
}

/// Transparent inputs/outputs with a compact-size count prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxsInOut(pub Vec<TxInOut>);

impl Decode for TxsInOut {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let count = read_compact_size(r)?;
        let mut items = Vec::new();
        for _ in 0..count {
            items.push(TxInOut::decode(r)?);
        }
        Ok(Self(items))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransparentBundle {
    pub vin: TxsInOut,
    pub vout: TxsInOut,
}

impl Decode for TransparentBundle {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            vin: TxsInOut::decode(r)?,
            vout: TxsInOut::decode(r)?,
        })
    }
}

/// The sapling bundle is consumed for framing only: counter-prefixed
/// runs of fixed-length descriptions and proofs, with the value
/// balance, anchors and binding signature present only when the
/// matching counters are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaplingBundle;

impl Decode for SaplingBundle {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let spends = read_compact_size(r)?;
        skip_blobs(r, spends, SPEND_DESCRIPTION_V5_LEN)?;
        let converts = read_compact_size(r)?;
        skip_blobs(r, converts, CONVERT_DESCRIPTION_V5_LEN)?;
        let outputs = read_compact_size(r)?;
        skip_blobs(r, outputs, OUTPUT_DESCRIPTION_V5_LEN)?;

        if spends > 0 || outputs > 0 {
            skip_i128_sum(r)?;
        }
        if spends > 0 {
            r.take(32)?;
        }
        if converts > 0 {
            r.take(32)?;
        }
        skip_blobs(r, spends, ZK_PROOF_LEN)?;
        skip_blobs(r, spends, SPEND_AUTH_SIG_LEN)?;
        skip_blobs(r, converts, ZK_PROOF_LEN)?;
        skip_blobs(r, outputs, ZK_PROOF_LEN)?;
        if spends > 0 || outputs > 0 {
            r.take(BINDING_SIG_LEN)?;
        }
        Ok(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionData {
    pub version: TxVersion,
    pub consensus_branch_id: u32,
    pub lock_time: u32,
    pub expiry_height: u32,
    pub transparent_bundle: TransparentBundle,
    pub sapling_bundle: SaplingBundle,
}

impl Decode for TransactionData {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            version: TxVersion::decode(r)?,
            consensus_branch_id: u32::decode(r)?,
            lock_time: u32::decode(r)?,
            expiry_height: u32::decode(r)?,
            transparent_bundle: TransparentBundle::decode(r)?,
            sapling_bundle: SaplingBundle::decode(r)?,
        })
    }
}

/// A shielded transaction section.
///
/// `tx_id` is not part of the wire form; it is the precomputed
/// identifier carried alongside the section and passed through into
/// the section hash. A freshly decoded section leaves it zeroed. The
/// decoder also retains the section's wire bytes so it can be
/// re-emitted without re-deriving the compact-size framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaspTx {
    pub tx_id: Hash,
    pub data: TransactionData,
    raw: Vec<u8>,
}

impl MaspTx {
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl Decode for MaspTx {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let start = r.pos();
        let data = TransactionData::decode(r)?;
        let raw = r.span_since(start).to_vec();
        Ok(Self {
            tx_id: Hash::ZERO,
            data,
            raw,
        })
    }
}

/// Position of a token's digit inside a multi-denomination amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaspDigitPos {
    Zero,
    One,
    Two,
    Three,
}

impl Decode for MaspDigitPos {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => MaspDigitPos::Zero,
            1 => MaspDigitPos::One,
            2 => MaspDigitPos::Two,
            3 => MaspDigitPos::Three,
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "MaspDigitPos",
                    tag,
                })
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetData {
    pub token: Address,
    pub denom: u8,
    pub position: MaspDigitPos,
    pub epoch: Option<u64>,
}

impl Decode for AssetData {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            token: Address::decode(r)?,
            denom: u8::decode(r)?,
            position: MaspDigitPos::decode(r)?,
            epoch: Option::<u64>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaplingMetadata {
    pub spend_indices: Vec<u64>,
    pub convert_indices: Vec<u64>,
    pub output_indices: Vec<u64>,
}

impl Decode for SaplingMetadata {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            spend_indices: Vec::<u64>::decode(r)?,
            convert_indices: Vec::<u64>::decode(r)?,
            output_indices: Vec::<u64>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparentInputInfo {
    pub coin: TxInOut,
}

impl Decode for TransparentInputInfo {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            coin: TxInOut::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparentBuilder {
    pub inputs: Vec<TransparentInputInfo>,
    pub vout: Vec<TxInOut>,
}

impl Decode for TransparentBuilder {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            inputs: Vec::<TransparentInputInfo>::decode(r)?,
            vout: Vec::<TxInOut>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub asset_type: [u8; 32],
    pub value: u64,
    pub gd: [u8; 32],
    pub pkd: [u8; 32],
    pub r_seed_type: u8,
    pub r_seed: [u8; 32],
}

impl Decode for Note {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            asset_type: r.array()?,
            value: u64::decode(r)?,
            gd: r.array()?,
            pkd: r.array()?,
            r_seed_type: u8::decode(r)?,
            r_seed: r.array()?,
        })
    }
}

/// Merkle authentication path: one depth byte, `depth` 33-byte nodes,
/// then the u64 leaf position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    pub auth_path: Vec<[u8; 33]>,
    pub position: u64,
}

impl Decode for MerklePath {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let depth = r.byte()? as usize;
        let mut auth_path = Vec::with_capacity(depth);
        for _ in 0..depth {
            auth_path.push(r.array()?);
        }
        Ok(Self {
            auth_path,
            position: u64::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendDescriptionInfo {
    pub exp_sk: [u8; 96],
    pub diversifier: [u8; 11],
    pub note: Note,
    pub alpha: [u8; 32],
    pub merkle_path: MerklePath,
}

impl Decode for SpendDescriptionInfo {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            exp_sk: r.array()?,
            diversifier: r.array()?,
            note: Note::decode(r)?,
            alpha: r.array()?,
            merkle_path: MerklePath::decode(r)?,
        })
    }
}

/// An allowed conversion: a compact-size-counted i128 sum plus the
/// generator point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedConversion {
    pub assets: Vec<[u8; 48]>,
    pub generator: [u8; 32],
}

impl Decode for AllowedConversion {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let count = read_compact_size(r)?;
        let mut assets = Vec::new();
        for _ in 0..count {
            assets.push(r.array()?);
        }
        Ok(Self {
            assets,
            generator: r.array()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertDescriptionInfo {
    pub allowed: AllowedConversion,
    pub value: u64,
    pub merkle_path: MerklePath,
}

impl Decode for ConvertDescriptionInfo {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            allowed: AllowedConversion::decode(r)?,
            value: u64::decode(r)?,
            merkle_path: MerklePath::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaplingOutputInfo {
    pub ovk: Option<[u8; 32]>,
    pub to: [u8; 43],
    pub note: Note,
    pub memo: [u8; 512],
}

impl Decode for SaplingOutputInfo {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            ovk: Option::<[u8; 32]>::decode(r)?,
            to: r.array()?,
            note: Note::decode(r)?,
            memo: r.array()?,
        })
    }
}

pub type I128Sum = OrderedMap<[u8; 32], [u8; 16]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaplingBuilder {
    pub spend_anchor: Option<[u8; 32]>,
    pub target_height: u32,
    pub value_balance: I128Sum,
    pub convert_anchor: Option<[u8; 32]>,
    pub spends: Vec<SpendDescriptionInfo>,
    pub converts: Vec<ConvertDescriptionInfo>,
    pub outputs: Vec<SaplingOutputInfo>,
}

impl Decode for SaplingBuilder {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            spend_anchor: Option::<[u8; 32]>::decode(r)?,
            target_height: u32::decode(r)?,
            value_balance: I128Sum::decode(r)?,
            convert_anchor: Option::<[u8; 32]>::decode(r)?,
            spends: Vec::<SpendDescriptionInfo>::decode(r)?,
            converts: Vec::<ConvertDescriptionInfo>::decode(r)?,
            outputs: Vec::<SaplingOutputInfo>::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    pub target_height: u32,
    pub expiry_height: u32,
    pub transparent_builder: TransparentBuilder,
    pub sapling_builder: SaplingBuilder,
}

impl Decode for Builder {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            target_height: u32::decode(r)?,
            expiry_height: u32::decode(r)?,
            transparent_builder: TransparentBuilder::decode(r)?,
            sapling_builder: SaplingBuilder::decode(r)?,
        })
    }
}
