//! Splitting a document into several smaller ones.
//!
//! Two modes are supported: fixed-size chunks, and explicit page groups
//! produced by [`crate::page_range`]. Every output is a complete PDF held in
//! memory; nothing is written to disk here.

use crate::error::{Error, Result};
use crate::page_range::{group_pages, parse_page_ranges, PageGroup};
use crate::pdf::PdfDocument;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SplitResult {
    /// "a-b" or "a", 1-based and inclusive
    pub label: String,
    pub page_count: u32,
    /// Base64 of the serialized PDF
    pub data: String,
}

impl SplitResult {
    fn build(doc: &PdfDocument, label: String, pages: &[u32]) -> Result<Self> {
        let mut new_doc = doc.copy_pages(pages)?;
        let bytes = PdfDocument::save_to_bytes(&mut new_doc)?;
        debug!(%label, pages = pages.len(), bytes = bytes.len(), "created split output");

        Ok(SplitResult {
            label,
            page_count: pages.len() as u32,
            data: STANDARD.encode(bytes),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| Error::LoadFailure(e.to_string()))
    }
}

/// Split into consecutive windows of `chunk_size` pages; the last may be shorter.
pub fn split_by_chunks(doc: &PdfDocument, chunk_size: i64) -> Result<Vec<SplitResult>> {
    if chunk_size <= 0 {
        return Err(Error::InvalidChunkSize(chunk_size));
    }
    let chunk_size = u32::try_from(chunk_size).unwrap_or(u32::MAX);
    let total = doc.page_count();

    let mut results = Vec::new();
    let mut start = 0u32;
    while start < total {
        let end = start.saturating_add(chunk_size).min(total);
        let pages: Vec<u32> = (start + 1..=end).collect();
        let label = format!("{}-{}", start + 1, end);
        results.push(SplitResult::build(doc, label, &pages)?);
        start = end;
    }

    Ok(results)
}

/// One output per group, labelled by the group's range.
pub fn split_by_groups(doc: &PdfDocument, groups: &[PageGroup]) -> Result<Vec<SplitResult>> {
    groups
        .iter()
        .map(|group| {
            let pages: Vec<u32> = group.pages().collect();
            SplitResult::build(doc, group.label(), &pages)
        })
        .collect()
}

/// Parse `spec` against the document and split by the resulting groups.
///
/// The expression is validated before any output document is created.
pub fn split_by_ranges(doc: &PdfDocument, spec: &str) -> Result<Vec<SplitResult>> {
    let pages = parse_page_ranges(spec, doc.page_count())?;
    let groups = group_pages(&pages);
    debug!(pages = pages.len(), groups = groups.len(), "parsed page ranges");
    split_by_groups(doc, &groups)
}
