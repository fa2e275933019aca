//! Denormalized snapshot load contract (§4.1, §6.4).

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::{Sense, VocabError};

#[derive(Debug, Deserialize)]
pub struct SnapshotDocument {
    pub version: String,
    pub senses: HashMap<String, Sense>,
    #[serde(default)]
    pub indices: SnapshotIndices,
}

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotIndices {
    #[serde(default, rename = "byBand")]
    pub by_band: HashMap<String, Vec<String>>,
    #[serde(default, rename = "byPos")]
    pub by_pos: HashMap<String, Vec<String>>,
    // `byWord` is intentionally not modeled: §4.1 requires the lemma index
    // to be rebuilt from sense_id prefixes, never trusted from the file.
}

/// Parses the snapshot document and checks it declares a supported
/// denormalized major version (§6.4: `"3.x"`).
pub fn parse(bytes: &[u8]) -> Result<SnapshotDocument, VocabError> {
    let doc: SnapshotDocument = serde_json::from_slice(bytes)?;
    if !doc.version.starts_with("3.") {
        return Err(VocabError::UnsupportedSnapshotVersion { found: doc.version });
    }
    Ok(doc)
}
