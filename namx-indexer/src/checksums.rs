//! Checksums file loading

use std::collections::HashMap;
use std::path::Path;

use namx_core::Checksums;

use crate::{IndexerError, Result};

/// Load and invert a `checksums.json` file.
pub fn load(path: &Path) -> Result<Checksums> {
    let content = std::fs::read_to_string(path)?;
    let raw: HashMap<String, String> = serde_json::from_str(&content)
        .map_err(|e| IndexerError::Checksums(format!("parse {}: {e}", path.display())))?;
    Checksums::from_raw(&raw).map_err(|e| IndexerError::Checksums(e.to_string()))
}
