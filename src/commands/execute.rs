use crate::node::params::NodeParameters;
use crate::node::{execute, NodeItem};
use anyhow::{Context, Result};
use std::path::Path;

/// Run a batch described by a JSON array of items and print the outputs.
pub fn run<P: AsRef<Path>>(
    items_path: P,
    params: &NodeParameters,
    continue_on_fail: bool,
) -> Result<()> {
    let items_path = items_path.as_ref();
    let raw = std::fs::read_to_string(items_path)
        .with_context(|| format!("Failed to read items: {}", items_path.display()))?;
    let items: Vec<NodeItem> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse items: {}", items_path.display()))?;

    let outputs = execute(&items, params, continue_on_fail)?;
    println!("{}", serde_json::to_string_pretty(&outputs)?);

    Ok(())
}
