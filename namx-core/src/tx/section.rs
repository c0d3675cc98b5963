//! Content-addressed transaction sections
//!
//! Every section is identified by `SHA-256(tag ‖ body)` where the tag
//! is the section's wire tag and the body is its canonical encoding.
//! The transaction identity hash reuses the header-section rule with
//! one rewrite: a Decrypted tx hashes as if it were Raw, so a
//! revealed payload and its originating raw transaction share one
//! hash.

use namx_types::{Address, Hash, OrderedMap, PublicKey, Signature};
use sha2::{Digest, Sha256};

use super::envelope::TxEnvelope;
use super::header::{Header, TxType};
use crate::error::{DecodeError, Result};
use crate::masp::{AssetData, Builder, MaspTx, SaplingMetadata};
use crate::wire::{Decode, Encode, Reader};

const SECTION_TAG_DATA: u8 = 0;
const SECTION_TAG_EXTRA_DATA: u8 = 1;
const SECTION_TAG_CODE: u8 = 2;
const SECTION_TAG_SIGNATURE: u8 = 3;
const SECTION_TAG_CIPHERTEXT: u8 = 4;
const SECTION_TAG_MASP_TX: u8 = 5;
const SECTION_TAG_MASP_BUILDER: u8 = 6;
const SECTION_TAG_HEADER: u8 = 7;

fn sha256_tagged(tag: u8, body: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([tag]);
    hasher.update(body);
    Hash(hasher.finalize().into())
}

/// An arbitrary-bytes payload section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionData {
    pub salt: [u8; 8],
    pub data: Vec<u8>,
}

impl Decode for SectionData {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            salt: r.array()?,
            data: Vec::<u8>::decode(r)?,
        })
    }
}

impl Encode for SectionData {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.salt);
        self.data.encode(out);
    }
}

/// Either a hash of some content or the content itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commitment {
    Hash(Hash),
    Id(Vec<u8>),
}

impl Commitment {
    /// The committed hash: the hash itself, or SHA-256 of the inline
    /// content.
    pub fn hash(&self) -> Hash {
        match self {
            Commitment::Hash(hash) => *hash,
            Commitment::Id(bytes) => Hash(Sha256::digest(bytes).into()),
        }
    }

    /// Human form: hex of the hash (empty for the zero sentinel), or
    /// the inline content as text.
    pub fn to_display_string(&self) -> String {
        match self {
            Commitment::Hash(hash) if hash.is_zero() => String::new(),
            Commitment::Hash(hash) => hash.to_string(),
            Commitment::Id(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl Decode for Commitment {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => Commitment::Hash(Hash::decode(r)?),
            1 => Commitment::Id(Vec::<u8>::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "Commitment",
                    tag,
                })
            }
        })
    }
}

impl Encode for Commitment {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Commitment::Hash(hash) => {
                out.push(0);
                hash.encode(out);
            }
            Commitment::Id(bytes) => {
                out.push(1);
                bytes.encode(out);
            }
        }
    }
}

/// A code or extra-data section: salted commitment plus an optional
/// tag naming the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCode {
    pub salt: [u8; 8],
    pub code: Commitment,
    pub tag: Option<String>,
}

impl SectionCode {
    /// Hash body: salt, then the commitment *hash* (not the inline
    /// content), then the encoded tag.
    fn hash_body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(8 + 32 + 1);
        body.extend_from_slice(&self.salt);
        self.code.hash().encode(&mut body);
        self.tag.encode(&mut body);
        body
    }
}

impl Decode for SectionCode {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            salt: r.array()?,
            code: Commitment::decode(r)?,
            tag: Option::<String>::decode(r)?,
        })
    }
}

impl Encode for SectionCode {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.salt);
        self.code.encode(out);
        self.tag.encode(out);
    }
}

/// Who produced a signature section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signer {
    Address(Address),
    PubKeys(Vec<PublicKey>),
}

impl Decode for Signer {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            0 => Signer::Address(Address::decode(r)?),
            1 => Signer::PubKeys(Vec::<PublicKey>::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "Signer",
                    tag,
                })
            }
        })
    }
}

impl Encode for Signer {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Signer::Address(address) => {
                out.push(0);
                address.encode(out);
            }
            Signer::PubKeys(keys) => {
                out.push(1);
                keys.encode(out);
            }
        }
    }
}

/// Signatures over a set of target section hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSignature {
    pub targets: Vec<Hash>,
    pub signer: Signer,
    pub signatures: OrderedMap<u8, Signature>,
}

impl Decode for SectionSignature {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            targets: Vec::<Hash>::decode(r)?,
            signer: Signer::decode(r)?,
            signatures: OrderedMap::<u8, Signature>::decode(r)?,
        })
    }
}

impl Encode for SectionSignature {
    fn encode(&self, out: &mut Vec<u8>) {
        self.targets.encode(out);
        self.signer.encode(out);
        self.signatures.encode(out);
    }
}

/// An opaque encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    pub opaque: Vec<u8>,
}

impl Decode for Ciphertext {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            opaque: Vec::<u8>::decode(r)?,
        })
    }
}

impl Encode for Ciphertext {
    fn encode(&self, out: &mut Vec<u8>) {
        self.opaque.encode(out);
    }
}

/// Shielded-transfer builder data. The section is hashed over its
/// canonical bytes, which the decoder retains as a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaspBuilder {
    pub target: Hash,
    pub asset_types: Vec<AssetData>,
    pub metadata: SaplingMetadata,
    pub builder: Builder,
    raw: Vec<u8>,
}

impl MaspBuilder {
    /// The canonical encoded bytes this section hashes over.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl Decode for MaspBuilder {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let start = r.pos();
        let target = Hash::decode(r)?;
        let asset_types = Vec::<AssetData>::decode(r)?;
        let metadata = SaplingMetadata::decode(r)?;
        let builder = Builder::decode(r)?;
        let raw = r.span_since(start).to_vec();
        Ok(Self {
            target,
            asset_types,
            metadata,
            builder,
            raw,
        })
    }
}

/// A transaction section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Data(SectionData),
    ExtraData(SectionCode),
    Code(SectionCode),
    Signature(SectionSignature),
    Ciphertext(Ciphertext),
    MaspTx(MaspTx),
    MaspBuilder(MaspBuilder),
    Header(Header),
}

impl Section {
    pub fn tag(&self) -> u8 {
        match self {
            Section::Data(_) => SECTION_TAG_DATA,
            Section::ExtraData(_) => SECTION_TAG_EXTRA_DATA,
            Section::Code(_) => SECTION_TAG_CODE,
            Section::Signature(_) => SECTION_TAG_SIGNATURE,
            Section::Ciphertext(_) => SECTION_TAG_CIPHERTEXT,
            Section::MaspTx(_) => SECTION_TAG_MASP_TX,
            Section::MaspBuilder(_) => SECTION_TAG_MASP_BUILDER,
            Section::Header(_) => SECTION_TAG_HEADER,
        }
    }

    /// The section's identifying hash.
    pub fn hash(&self) -> Hash {
        let body = match self {
            Section::Data(data) => data.to_bytes(),
            Section::ExtraData(code) | Section::Code(code) => code.hash_body(),
            Section::Signature(signature) => signature.to_bytes(),
            Section::Ciphertext(ciphertext) => ciphertext.to_bytes(),
            // The shielded transaction's own id is passed through,
            // never recomputed here.
            Section::MaspTx(masp) => masp.tx_id.0.to_vec(),
            Section::MaspBuilder(builder) => builder.raw.clone(),
            Section::Header(header) => header.to_bytes(),
        };
        sha256_tagged(self.tag(), &body)
    }
}

impl Decode for Section {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(match r.byte()? {
            SECTION_TAG_DATA => Section::Data(SectionData::decode(r)?),
            SECTION_TAG_EXTRA_DATA => Section::ExtraData(SectionCode::decode(r)?),
            SECTION_TAG_CODE => Section::Code(SectionCode::decode(r)?),
            SECTION_TAG_SIGNATURE => Section::Signature(SectionSignature::decode(r)?),
            SECTION_TAG_CIPHERTEXT => Section::Ciphertext(Ciphertext::decode(r)?),
            SECTION_TAG_MASP_TX => Section::MaspTx(MaspTx::decode(r)?),
            SECTION_TAG_MASP_BUILDER => Section::MaspBuilder(MaspBuilder::decode(r)?),
            SECTION_TAG_HEADER => Section::Header(Header::decode(r)?),
            tag => {
                return Err(DecodeError::UnknownTag {
                    what: "Section",
                    tag,
                })
            }
        })
    }
}

impl Encode for Section {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.tag());
        match self {
            Section::Data(data) => data.encode(out),
            Section::ExtraData(code) | Section::Code(code) => code.encode(out),
            Section::Signature(signature) => signature.encode(out),
            Section::Ciphertext(ciphertext) => ciphertext.encode(out),
            Section::MaspTx(masp) => out.extend_from_slice(masp.raw_bytes()),
            Section::MaspBuilder(builder) => out.extend_from_slice(&builder.raw),
            Section::Header(header) => header.encode(out),
        }
    }
}

/// A decoded transaction: header plus ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub header: Header,
    pub sections: Vec<Section>,
}

impl Decode for Tx {
    fn decode(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: Header::decode(r)?,
            sections: Vec::<Section>::decode(r)?,
        })
    }
}

impl Encode for Tx {
    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        self.sections.encode(out);
    }
}

impl Tx {
    /// Decode an on-chain blob: strip the protobuf envelope, then
    /// decode the inner wire form.
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        use prost::Message;
        let envelope = TxEnvelope::decode(bytes)?;
        Tx::decode_all(&envelope.data)
    }

    /// The stored `tx_type` string.
    pub fn kind(&self) -> &'static str {
        self.header.tx_type.kind()
    }

    /// The transaction identity hash: the header-section hash with
    /// Decrypted rewritten to Raw, so a revealed payload hashes the
    /// same as the raw transaction it came from.
    pub fn hash(&self) -> Hash {
        let mut header = self.header.clone();
        if header.tx_type.is_decrypted() {
            header.tx_type = TxType::Raw;
        }
        sha256_tagged(SECTION_TAG_HEADER, &header.to_bytes())
    }

    /// The first section whose hash equals `wanted`. The zero
    /// sentinel never matches anything.
    pub fn get_section(&self, wanted: Hash) -> Option<&Section> {
        if wanted.is_zero() {
            return None;
        }
        self.sections.iter().find(|s| s.hash() == wanted)
    }

    /// Hash of the code committed by the code section, or zero when
    /// the header points at no section.
    pub fn code_hash(&self) -> Hash {
        match self.get_section(self.header.code_hash) {
            Some(Section::Code(code)) => code.code.hash(),
            _ => Hash::ZERO,
        }
    }

    /// Human form of the memo section's commitment, empty when the
    /// header points at no section.
    pub fn memo(&self) -> String {
        match self.get_section(self.header.memo_hash) {
            Some(Section::ExtraData(code)) => code.code.to_display_string(),
            _ => String::new(),
        }
    }
}
