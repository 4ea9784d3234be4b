use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::path::Path;

use sdt_core::errors::{ErrorInfo, SdtError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn serde_error(code: &str, err: impl ToString) -> SdtError {
    SdtError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into JSON bytes with object keys sorted.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SdtError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer_pretty(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Which renderer produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ArtifactKind {
    /// The PHP profile generator script.
    Php,
    /// The plain-text design summary.
    Summary,
    /// A question template for one choice task.
    Template {
        /// 1-based task number.
        task: usize,
    },
}

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Renderer that produced the file.
    #[serde(flatten)]
    pub kind: ArtifactKind,
    /// Destination path as given to the export call.
    pub path: String,
    /// Lowercase hex SHA-256 of the written contents.
    pub sha256: String,
    /// Size of the written contents.
    pub bytes: u64,
}

impl ArtifactRecord {
    /// Describes `contents` about to be written to `path`.
    pub fn new(kind: ArtifactKind, path: &Path, contents: &[u8]) -> Self {
        Self {
            kind,
            path: path.display().to_string(),
            sha256: hex::encode(Sha256::digest(contents)),
            bytes: contents.len() as u64,
        }
    }
}

/// Everything a single export call wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Written files, in write order.
    pub artifacts: Vec<ArtifactRecord>,
}

impl ExportReport {
    /// Digest over the canonical JSON form of the report.
    pub fn digest(&self) -> Result<String, SdtError> {
        let bytes = to_canonical_json_bytes(self)?;
        Ok(hex::encode(Sha256::digest(bytes)))
    }

    /// Canonical JSON text, as printed by the command line.
    pub fn to_json(&self) -> Result<String, SdtError> {
        let bytes = to_canonical_json_bytes(self)?;
        String::from_utf8(bytes).map_err(|err| serde_error("json-utf8", err))
    }
}
