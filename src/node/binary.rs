use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A named binary attachment on a work item.
///
/// The payload travels either inline as base64 `data` or as a `filePath`
/// pointing at a file the host has already written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
}

impl BinaryData {
    /// An inline PDF attachment.
    pub fn pdf(data: String, file_name: String) -> Self {
        BinaryData {
            data: Some(data),
            file_path: None,
            file_name: Some(file_name),
            mime_type: Some(PDF_MIME_TYPE.to_string()),
            file_extension: Some("pdf".to_string()),
        }
    }

    /// File name with its extension stripped, or "document".
    pub fn stem(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("document")
            .to_string()
    }
}

/// One way of turning a [`BinaryData`] into bytes.
pub trait BinarySource {
    fn name(&self) -> &'static str;
    fn read(&self, binary: &BinaryData) -> Result<Vec<u8>>;
}

/// Reads the file named by `filePath`.
pub struct FilesystemSource;

impl BinarySource for FilesystemSource {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn read(&self, binary: &BinaryData) -> Result<Vec<u8>> {
        let path = binary
            .file_path
            .as_deref()
            .ok_or_else(|| Error::LoadFailure("no file path".into()))?;
        std::fs::read(path).map_err(|e| Error::LoadFailure(format!("{}: {}", path, e)))
    }
}

/// Decodes the inline base64 `data`.
pub struct MemorySource;

impl BinarySource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, binary: &BinaryData) -> Result<Vec<u8>> {
        let data = binary
            .data
            .as_deref()
            .ok_or_else(|| Error::LoadFailure("no inline data".into()))?;
        STANDARD
            .decode(data.trim())
            .map_err(|e| Error::LoadFailure(format!("invalid base64: {}", e)))
    }
}

pub fn default_sources() -> [&'static dyn BinarySource; 2] {
    [&FilesystemSource, &MemorySource]
}

/// Fetch the attachment stored under `property` and its bytes, trying each
/// source in order.
///
/// Errors from earlier sources are only reported when every source fails.
pub fn acquire<'a>(
    binary: &'a BTreeMap<String, BinaryData>,
    property: &str,
    sources: &[&dyn BinarySource],
) -> Result<(&'a BinaryData, Vec<u8>)> {
    let entry = binary
        .get(property)
        .filter(|b| b.data.is_some() || b.file_path.is_some())
        .ok_or_else(|| Error::MissingInput {
            property: property.to_string(),
        })?;

    let mut failures = Vec::new();
    for source in sources {
        match source.read(entry) {
            Ok(bytes) => {
                debug!(source = source.name(), bytes = bytes.len(), "read binary input");
                return Ok((entry, bytes));
            }
            Err(e) => failures.push(format!("{}: {}", source.name(), e)),
        }
    }

    Err(Error::LoadFailure(failures.join("; ")))
}
