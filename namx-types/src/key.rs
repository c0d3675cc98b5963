//! Public keys and signatures
//!
//! The tagged [`PublicKey`] and [`Signature`] unions render as bech32m
//! over their tagged byte form (tag byte then key/signature bytes),
//! with HRPs `tpknam` and `signam`. Bare curve keys render as the
//! consensus-engine validator address form instead: uppercase hex of a
//! 20-byte digest of the key.

use std::fmt;

use bech32::{Bech32m, Hrp};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

const PUBLIC_KEY_HRP: &str = "tpknam";
const SIGNATURE_HRP: &str = "signam";

fn encode_bech32m(hrp: &str, payload: &[u8]) -> String {
    let hrp = Hrp::parse(hrp).expect("static HRP is valid");
    bech32::encode::<Bech32m>(hrp, payload).expect("encoding a short payload should never fail")
}

/// 32-byte Ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl fmt::Display for Ed25519PublicKey {
    /// Validator address form: uppercase hex of SHA-256(key)[..20].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digest = Sha256::digest(self.0);
        f.write_str(&hex::encode_upper(&digest[..20]))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 33-byte compressed secp256k1 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1PublicKey(pub [u8; 33]);

impl fmt::Display for Secp256k1PublicKey {
    /// Validator address form: uppercase hex of RIPEMD-160(SHA-256(key)).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ripemd::Digest as _;
        let sha = Sha256::digest(self.0);
        let digest = ripemd::Ripemd160::digest(sha);
        f.write_str(&hex::encode_upper(digest))
    }
}

impl Serialize for Secp256k1PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A public key of either supported scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// Tag byte followed by the raw key bytes.
    pub fn tagged_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => {
                let mut bytes = Vec::with_capacity(33);
                bytes.push(0);
                bytes.extend_from_slice(&key.0);
                bytes
            }
            PublicKey::Secp256k1(key) => {
                let mut bytes = Vec::with_capacity(34);
                bytes.push(1);
                bytes.extend_from_slice(&key.0);
                bytes
            }
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_bech32m(PUBLIC_KEY_HRP, &self.tagged_bytes()))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 64-byte Ed25519 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

/// 65-byte recoverable secp256k1 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Signature(pub [u8; 65]);

/// A signature of either supported scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Ed25519(Ed25519Signature),
    Secp256k1(Secp256k1Signature),
}

impl Signature {
    /// Tag byte followed by the raw signature bytes.
    pub fn tagged_bytes(&self) -> Vec<u8> {
        match self {
            Signature::Ed25519(sig) => {
                let mut bytes = Vec::with_capacity(65);
                bytes.push(0);
                bytes.extend_from_slice(&sig.0);
                bytes
            }
            Signature::Secp256k1(sig) => {
                let mut bytes = Vec::with_capacity(66);
                bytes.push(1);
                bytes.extend_from_slice(&sig.0);
                bytes
            }
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_bech32m(SIGNATURE_HRP, &self.tagged_bytes()))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
