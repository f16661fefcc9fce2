//! Batch execution contract.
//!
//! A host hands over a list of work items, each carrying named binary
//! attachments, and gets back one output per item. Items are processed one
//! after another and never share state.

pub mod binary;
pub mod params;

use crate::error::{ItemError, Result};
use crate::pdf::info::extract as extract_info;
use crate::pdf::split::{split_by_chunks, split_by_ranges, SplitResult};
use crate::pdf::PdfDocument;
use binary::{acquire, default_sources, BinaryData, BinarySource};
use params::{NodeParameters, Operation, SplitMode};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NodeItem {
    #[serde(default)]
    pub json: Value,
    #[serde(default)]
    pub binary: BTreeMap<String, BinaryData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub json: Value,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binary: BTreeMap<String, BinaryData>,
    /// Index of the input item this output belongs to
    pub paired_item: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SplitSummary<'a> {
    file_name: &'a str,
    total_pages: u32,
    split_mode: SplitMode,
    output_count: usize,
    ranges: Vec<&'a str>,
}

/// Run `params.operation` over every item.
///
/// With `continue_on_fail` a failing item yields an `{ "error": ... }` record
/// and the batch goes on; otherwise the first failure stops the batch.
pub fn execute(
    items: &[NodeItem],
    params: &NodeParameters,
    continue_on_fail: bool,
) -> std::result::Result<Vec<NodeOutput>, ItemError> {
    execute_with_sources(items, params, continue_on_fail, &default_sources())
}

/// [`execute`] with the transports used to read each item's payload.
pub fn execute_with_sources(
    items: &[NodeItem],
    params: &NodeParameters,
    continue_on_fail: bool,
    sources: &[&dyn BinarySource],
) -> std::result::Result<Vec<NodeOutput>, ItemError> {
    let mut outputs = Vec::with_capacity(items.len());

    for (item_index, item) in items.iter().enumerate() {
        match process_item(item_index, item, params, sources) {
            Ok(output) => outputs.push(output),
            Err(source) if continue_on_fail => {
                warn!(item = item_index, error = %source, "item failed, continuing");
                outputs.push(NodeOutput {
                    json: json!({ "error": source.to_string() }),
                    binary: BTreeMap::new(),
                    paired_item: item_index,
                });
            }
            Err(source) => return Err(ItemError { item_index, source }),
        }
    }

    Ok(outputs)
}

fn process_item(
    item_index: usize,
    item: &NodeItem,
    params: &NodeParameters,
    sources: &[&dyn BinarySource],
) -> Result<NodeOutput> {
    let property = params.binary_property_name.as_str();
    info!(item = item_index, operation = ?params.operation, property, "processing item");

    let (input, bytes) = acquire(&item.binary, property, sources)?;
    let doc = PdfDocument::from_bytes(&bytes)?;
    let file_name = input.file_name.as_deref().unwrap_or("document.pdf");

    match params.operation {
        Operation::GetInfo => {
            let info = extract_info(&doc, &bytes);
            let mut json = serde_json::to_value(&info)?;
            if let Value::Object(map) = &mut json {
                map.insert("fileName".to_string(), Value::String(file_name.to_string()));
            }
            Ok(NodeOutput {
                json,
                binary: BTreeMap::new(),
                paired_item: item_index,
            })
        }
        Operation::Split => {
            let results = match params.split_mode {
                SplitMode::ChunkSize => split_by_chunks(&doc, params.chunk_size)?,
                SplitMode::PageRanges => split_by_ranges(&doc, &params.page_ranges)?,
            };

            let stem = input.stem();
            let binary = results
                .iter()
                .enumerate()
                .map(|(i, result)| {
                    let name = output_file_name(&stem, params.split_mode, i + 1, result);
                    (format!("pdf{}", i + 1), BinaryData::pdf(result.data.clone(), name))
                })
                .collect();

            let summary = SplitSummary {
                file_name,
                total_pages: doc.page_count(),
                split_mode: params.split_mode,
                output_count: results.len(),
                ranges: results.iter().map(|r| r.label.as_str()).collect(),
            };

            Ok(NodeOutput {
                json: serde_json::to_value(&summary)?,
                binary,
                paired_item: item_index,
            })
        }
    }
}

/// `<stem>_chunk_<n>.pdf` or `<stem>_pages_<label>.pdf`
pub fn output_file_name(
    stem: &str,
    mode: SplitMode,
    index: usize,
    result: &SplitResult,
) -> String {
    match mode {
        SplitMode::ChunkSize => format!("{}_chunk_{}.pdf", stem, index),
        SplitMode::PageRanges => format!("{}_pages_{}.pdf", stem, result.label),
    }
}
