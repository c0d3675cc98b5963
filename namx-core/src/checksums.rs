//! Code-hash to tx-type-name map
//!
//! The chain publishes a checksums file mapping artifact names to
//! `<name>.<hex>` strings, where the hex is the SHA-256 of the wasm
//! code. The dispatcher needs the opposite direction, so the map is
//! inverted to `hex → name` on load.

use std::collections::HashMap;

use namx_types::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChecksumsError {
    #[error("malformed checksums entry {0:?}: expected a <name>.<hex> value")]
    MalformedEntry(String),
}

/// Lowercase-hex code hash to tx-type name.
#[derive(Debug, Clone, Default)]
pub struct Checksums {
    by_hash: HashMap<String, String>,
}

impl Checksums {
    /// Invert a raw checksums map. Each value must carry at least a
    /// name and a hex segment separated by dots.
    pub fn from_raw(raw: &HashMap<String, String>) -> Result<Self, ChecksumsError> {
        let mut by_hash = HashMap::with_capacity(raw.len());
        for value in raw.values() {
            let mut parts = value.split('.');
            let name = parts.next().filter(|s| !s.is_empty());
            let hash = parts.next().filter(|s| !s.is_empty());
            match (name, hash) {
                (Some(name), Some(hash)) => {
                    by_hash.insert(hash.to_lowercase(), name.to_string());
                }
                _ => return Err(ChecksumsError::MalformedEntry(value.clone())),
            }
        }
        Ok(Self { by_hash })
    }

    /// The tx-type name for a code hash, if known.
    pub fn lookup(&self, code_hash: &Hash) -> Option<&str> {
        self.by_hash.get(&code_hash.to_string()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_values_to_hex_to_name() {
        let mut raw = HashMap::new();
        raw.insert(
            "tx_transfer.wasm".to_string(),
            format!("tx_transfer.{}.wasm", "ab".repeat(32)),
        );
        let checksums = Checksums::from_raw(&raw).unwrap();
        assert_eq!(checksums.len(), 1);

        let hash = Hash([0xab; 32]);
        assert_eq!(checksums.lookup(&hash), Some("tx_transfer"));
        assert_eq!(checksums.lookup(&Hash([0xcd; 32])), None);
    }

    #[test]
    fn hex_is_normalised_to_lowercase() {
        let mut raw = HashMap::new();
        raw.insert(
            "tx_bond.wasm".to_string(),
            format!("tx_bond.{}", "AB".repeat(32)),
        );
        let checksums = Checksums::from_raw(&raw).unwrap();
        assert_eq!(checksums.lookup(&Hash([0xab; 32])), Some("tx_bond"));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let mut raw = HashMap::new();
        raw.insert("bad".to_string(), "no-dot-here".to_string());
        assert!(Checksums::from_raw(&raw).is_err());
    }
}
