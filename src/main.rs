mod cli;
mod commands;
mod error;
mod mcp;
mod node;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::split::SplitBy;
use node::params::NodeParameters;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries MCP traffic and JSON output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdfnode=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path, json } => {
            commands::info::run(&path, json)?;
        }
        Commands::Split {
            path,
            chunk_size,
            pages,
            output_dir,
        } => {
            let split_by = match (chunk_size, pages.as_deref()) {
                (_, Some(spec)) => SplitBy::Ranges(spec),
                (Some(size), None) => SplitBy::Chunks(size),
                (None, None) => anyhow::bail!("Either --chunk-size or --pages is required"),
            };
            commands::split::run(&path, split_by, &output_dir)?;
        }
        Commands::Execute {
            items,
            operation,
            binary_property,
            split_mode,
            chunk_size,
            pages,
            continue_on_fail,
        } => {
            let params = NodeParameters {
                operation,
                binary_property_name: binary_property,
                split_mode,
                chunk_size,
                page_ranges: pages,
            };
            commands::execute::run(&items, &params, continue_on_fail)?;
        }
    }

    Ok(())
}
