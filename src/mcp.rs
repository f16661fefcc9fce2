use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::commands::split::{split_to_dir, SplitBy};
use crate::node::params::NodeParameters;
use crate::node::{execute, NodeItem};
use crate::pdf::info::extract;
use crate::pdf::PdfDocument;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages per output document (used when 'pages' is absent)")]
    pub chunk_size: Option<i64>,
    #[schemars(description = "Page ranges (e.g., '1-3,5,7-10'); one output per consecutive run")]
    pub pages: Option<String>,
    #[schemars(description = "Directory the output files are written to")]
    pub output_dir: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExecuteRequest {
    #[schemars(description = "Operation and split settings applied to every item")]
    #[serde(default)]
    pub parameters: NodeParameters,
    #[schemars(description = "Work items; each carries its PDF under parameters.binaryPropertyName")]
    pub items: Vec<NodeItem>,
    #[schemars(description = "Record per-item failures instead of stopping (default: false)")]
    #[serde(default)]
    pub continue_on_fail: bool,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF page count, metadata, technical flags, and per-page geometry")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => return format!("Error: Failed to read {}: {}", path, e),
        };
        match PdfDocument::from_bytes(&bytes) {
            Ok(doc) => {
                let info = extract(&doc, &bytes);
                serde_json::to_string_pretty(&info).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Split a PDF into fixed-size chunks or by page ranges and write the parts to a directory")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let split_by = match (req.pages.as_deref(), req.chunk_size) {
            (Some(spec), _) => SplitBy::Ranges(spec),
            (None, Some(size)) => SplitBy::Chunks(size),
            (None, None) => return "Error: either 'pages' or 'chunk_size' is required".to_string(),
        };

        match split_to_dir(&req.path, split_by, &req.output_dir) {
            Ok(summary) => {
                let result = SplitToolResult {
                    total_pages: summary.total_pages,
                    output_count: summary.parts.len(),
                    files: summary
                        .parts
                        .into_iter()
                        .map(|p| SplitFileResult {
                            output_path: p.path.display().to_string(),
                            range: p.label,
                            page_count: p.page_count,
                        })
                        .collect(),
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Run getInfo or split over a batch of work items with inline base64 or file-path PDF payloads")]
    fn pdf_execute(&self, Parameters(req): Parameters<PdfExecuteRequest>) -> String {
        match execute(&req.items, &req.parameters, req.continue_on_fail) {
            Ok(outputs) => {
                serde_json::to_string_pretty(&outputs).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitFileResult {
    pub output_path: String,
    pub range: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitToolResult {
    pub total_pages: u32,
    pub output_count: usize,
    pub files: Vec<SplitFileResult>,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF metadata and splitting tools. Use pdf_info to inspect a document, \
                 pdf_split to break it into chunks or page ranges on disk, and pdf_execute \
                 to run the node contract over a batch of work items."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::create_test_pdf;

    #[test]
    fn test_pdf_split_tool_writes_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.pdf");
        std::fs::write(&input, create_test_pdf(6)).unwrap();

        let server = PdfServer::new();
        let out = server.pdf_split(Parameters(PdfSplitRequest {
            path: input.display().to_string(),
            chunk_size: None,
            pages: Some("1-2,5".to_string()),
            output_dir: dir.path().join("out").display().to_string(),
        }));

        let result: SplitToolResult = serde_json::from_str(&out).unwrap();
        assert_eq!(result.output_count, 2);
        assert!(result.files[0].output_path.ends_with("deck_pages_1-2.pdf"));
        assert!(result.files[1].output_path.ends_with("deck_pages_5.pdf"));
    }

    #[test]
    fn test_pdf_info_tool_reports_errors_inline() {
        let server = PdfServer::new();
        let out = server.pdf_info(Parameters(PathRequest {
            path: "/nonexistent/file.pdf".to_string(),
        }));
        assert!(out.starts_with("Error:"));
    }

    #[test]
    fn test_router_exposes_all_tools() {
        let server = PdfServer::new();
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["pdf_execute", "pdf_info", "pdf_split"]);

        let info = ServerHandler::get_info(&server);
        assert!(info.capabilities.tools.is_some());
    }
}
