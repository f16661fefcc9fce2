use crate::node::params::{Operation, SplitMode};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfnode")]
#[command(about = "PDF metadata and splitting node with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (primary mode)
    Mcp,

    /// Display PDF metadata and page geometry
    Info {
        /// PDF file to inspect
        path: PathBuf,

        /// Print the full JSON record
        #[arg(long)]
        json: bool,
    },

    /// Split a PDF into fixed-size chunks or by page ranges
    #[command(group(ArgGroup::new("mode").required(true).args(["chunk_size", "pages"])))]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Pages per output document
        #[arg(short, long, allow_negative_numbers = true)]
        chunk_size: Option<i64>,

        /// Page ranges (e.g., "1-3,5,7-10"); one output per consecutive run
        #[arg(short, long)]
        pages: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Process a JSON array of work items the way a workflow host would
    Execute {
        /// JSON file holding `[{ "json": {...}, "binary": { "data": {...} } }, ...]`
        items: PathBuf,

        #[arg(long, value_enum, default_value = "getInfo")]
        operation: Operation,

        /// Binary property holding the PDF on each item
        #[arg(long, default_value = "data")]
        binary_property: String,

        #[arg(long, value_enum, default_value = "chunkSize")]
        split_mode: SplitMode,

        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        chunk_size: i64,

        /// Page ranges for `--split-mode pageRanges`
        #[arg(long, default_value = "")]
        pages: String,

        /// Record per-item failures instead of stopping the batch
        #[arg(long)]
        continue_on_fail: bool,
    },
}
