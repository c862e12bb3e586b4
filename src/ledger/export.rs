// src/ledger/export.rs
//! Serialized views of the ledger
//!
//! The snapshot is a list of per-block records; the export document maps
//! `Block0`, `Block1`, ... to those records and is pretty-printed with a
//! four-space indent.

use super::block::Block;
use crate::runtime::value::Value;
use crate::ExportError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::Path;

/// One block as the outside world sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecord {
    #[serde(rename = "Index")]
    pub index: Option<usize>,

    #[serde(rename = "Hash")]
    pub hash: String,

    #[serde(rename = "Previous Hash")]
    pub previous_hash: Option<String>,

    #[serde(rename = "Nonce")]
    pub nonce: u64,

    #[serde(rename = "Data")]
    pub data: Value,
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index(),
            hash: block.hash().to_string(),
            previous_hash: block.previous_hash().map(str::to_string),
            nonce: block.nonce(),
            data: block.data().clone(),
        }
    }
}

/// `{"Block0": {...}, "Block1": {...}}` in chain order
pub struct ExportDocument<'a>(pub &'a [BlockRecord]);

impl Serialize for ExportDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (position, record) in self.0.iter().enumerate() {
            let key = format!("Block{}", record.index.unwrap_or(position));
            map.serialize_entry(&key, record)?;
        }
        map.end()
    }
}

/// Pretty JSON with four-space indentation
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Export document bytes for the given records
pub fn export_bytes(records: &[BlockRecord]) -> Result<Vec<u8>, ExportError> {
    to_pretty_json(&ExportDocument(records))
}

/// Write the export document to `path`, replacing any previous export
pub fn write_export(path: &Path, records: &[BlockRecord]) -> Result<(), ExportError> {
    let bytes = export_bytes(records)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::FieldMap;

    fn records() -> Vec<BlockRecord> {
        vec![
            BlockRecord {
                index: Some(0),
                hash: "00ab".to_string(),
                previous_hash: Some("0".repeat(4)),
                nonce: 7,
                data: Value::from("Genesis Block"),
            },
            BlockRecord {
                index: Some(1),
                hash: "00cd".to_string(),
                previous_hash: Some("00ab".to_string()),
                nonce: 3,
                data: Value::Dict(FieldMap::new().with_field("name", "Alice").with_field("age", 30)),
            },
        ]
    }

    #[test]
    fn test_export_document_layout() {
        let text = String::from_utf8(export_bytes(&records()).unwrap()).unwrap();

        let expected = r#"{
    "Block0": {
        "Index": 0,
        "Hash": "00ab",
        "Previous Hash": "0000",
        "Nonce": 7,
        "Data": "Genesis Block"
    },
    "Block1": {
        "Index": 1,
        "Hash": "00cd",
        "Previous Hash": "00ab",
        "Nonce": 3,
        "Data": {
            "name": "Alice",
            "age": 30
        }
    }
}"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        write_export(&path, &records()).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed["Block1"]["Data"]["name"], "Alice");
        assert_eq!(parsed["Block0"]["Previous Hash"], "0000");
    }

    #[test]
    fn test_unlinked_record_serializes_nulls() {
        let record = BlockRecord {
            index: None,
            hash: "ff".to_string(),
            previous_hash: None,
            nonce: 0,
            data: Value::Int(1),
        };
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"Index":null,"Hash":"ff","Previous Hash":null,"Nonce":0,"Data":1}"#
        );
    }
}
