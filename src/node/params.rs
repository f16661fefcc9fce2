use clap::ValueEnum;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Report page count and document metadata
    #[default]
    #[value(name = "getInfo")]
    GetInfo,
    /// Split into several smaller documents
    #[value(name = "split")]
    Split,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum SplitMode {
    /// Fixed number of pages per output
    #[default]
    #[value(name = "chunkSize")]
    ChunkSize,
    /// Explicit page ranges, one output per consecutive run
    #[value(name = "pageRanges")]
    PageRanges,
}

/// Per-invocation settings shared by every item in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeParameters {
    pub operation: Operation,
    pub binary_property_name: String,
    pub split_mode: SplitMode,
    pub chunk_size: i64,
    pub page_ranges: String,
}

impl Default for NodeParameters {
    fn default() -> Self {
        NodeParameters {
            operation: Operation::GetInfo,
            binary_property_name: "data".to_string(),
            split_mode: SplitMode::ChunkSize,
            chunk_size: 1,
            page_ranges: String::new(),
        }
    }
}
