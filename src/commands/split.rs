use crate::node::binary::BinaryData;
use crate::node::output_file_name;
use crate::node::params::SplitMode;
use crate::pdf::split::{split_by_chunks, split_by_ranges};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub enum SplitBy<'a> {
    Chunks(i64),
    Ranges(&'a str),
}

#[derive(Debug, Clone)]
pub struct WrittenPart {
    pub path: PathBuf,
    pub label: String,
    pub page_count: u32,
}

#[derive(Debug, Clone)]
pub struct SplitSummary {
    pub total_pages: u32,
    pub parts: Vec<WrittenPart>,
}

/// Split `input` and write every part into `output_dir`.
///
/// The split runs before the directory is touched, so an invalid request
/// leaves the filesystem unchanged.
pub fn split_to_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    split_by: SplitBy<'_>,
    output_dir: Q,
) -> Result<SplitSummary> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    let doc = PdfDocument::open(input)?;
    let (mode, results) = match split_by {
        SplitBy::Chunks(size) => (SplitMode::ChunkSize, split_by_chunks(&doc, size)?),
        SplitBy::Ranges(spec) => (SplitMode::PageRanges, split_by_ranges(&doc, spec)?),
    };

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let stem = BinaryData {
        file_name: input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned()),
        ..Default::default()
    }
    .stem();

    let mut parts = Vec::with_capacity(results.len());
    for (i, result) in results.iter().enumerate() {
        let path = output_dir.join(output_file_name(&stem, mode, i + 1, result));
        std::fs::write(&path, result.decode()?)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
        parts.push(WrittenPart {
            path,
            label: result.label.clone(),
            page_count: result.page_count,
        });
    }

    Ok(SplitSummary {
        total_pages: doc.page_count(),
        parts,
    })
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    split_by: SplitBy<'_>,
    output_dir: Q,
) -> Result<()> {
    let summary = split_to_dir(input, split_by, &output_dir)?;

    for part in &summary.parts {
        println!(
            "{} ({} page(s)) -> {}",
            part.label,
            part.page_count,
            part.path.display()
        );
    }
    println!(
        "Split {} pages into {} file(s) in {}",
        summary.total_pages,
        summary.parts.len(),
        output_dir.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::create_test_pdf;

    #[test]
    fn test_writes_chunk_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.pdf");
        std::fs::write(&input, create_test_pdf(5)).unwrap();

        let summary = split_to_dir(&input, SplitBy::Chunks(2), dir.path().join("out")).unwrap();

        let names: Vec<_> = summary
            .parts
            .iter()
            .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["book_chunk_1.pdf", "book_chunk_2.pdf", "book_chunk_3.pdf"]
        );
        let last = PdfDocument::open(&summary.parts[2].path).unwrap();
        assert_eq!(last.page_count(), 1);
    }

    #[test]
    fn test_writes_range_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.pdf");
        std::fs::write(&input, create_test_pdf(5)).unwrap();

        let summary =
            split_to_dir(&input, SplitBy::Ranges("1-2,4"), dir.path().join("out")).unwrap();
        let labels: Vec<_> = summary.parts.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["1-2", "4"]);
        assert!(summary.parts[1].path.ends_with("book_pages_4.pdf"));
    }

    #[test]
    fn test_invalid_ranges_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.pdf");
        std::fs::write(&input, create_test_pdf(5)).unwrap();

        let out = dir.path().join("out");
        assert!(split_to_dir(&input, SplitBy::Ranges("4-9"), &out).is_err());
        assert!(!out.exists());
    }
}
