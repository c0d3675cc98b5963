//! Transaction envelope and sections

mod envelope;
mod header;
mod section;

pub use envelope::TxEnvelope;
pub use header::{DecryptedTx, Fee, Header, ProtocolTx, ProtocolTxType, TxType, WrapperTx};
pub use section::{
    Ciphertext, Commitment, MaspBuilder, Section, SectionCode, SectionData, SectionSignature,
    Signer, Tx,
};
