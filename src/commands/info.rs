use crate::pdf::info::extract;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P, as_json: bool) -> Result<()> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    let doc = PdfDocument::from_bytes(&bytes)
        .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
    let info = extract(&doc, &bytes);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("Pages: {}", info.page_count);

    let meta = &info.metadata;
    let fields = [
        ("Title", &meta.title),
        ("Author", &meta.author),
        ("Subject", &meta.subject),
        ("Keywords", &meta.keywords),
        ("Creator", &meta.creator),
        ("Producer", &meta.producer),
        ("Created", &meta.creation_date),
        ("Modified", &meta.modification_date),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }

    let tech = &info.technical_info;
    println!("PDF version: {}", tech.pdf_version);
    println!("File size: {} bytes", tech.file_size);
    if let Some(encrypted) = tech.encrypted {
        println!("Encrypted: {}", if encrypted { "yes" } else { "no" });
    }
    if let Some(has_form) = tech.has_form {
        println!("Form: {}", if has_form { "yes" } else { "no" });
    }

    let stats = &info.page_statistics;
    println!(
        "Orientation: {} portrait, {} landscape ({} rotated)",
        stats.portrait_pages, stats.landscape_pages, stats.rotated_pages
    );
    if stats.uniform_page_size {
        if let Some(first) = info.page_details.first() {
            println!("Page size: {} x {} pt", first.width, first.height);
        }
    } else {
        println!("Page sizes: {} distinct", stats.unique_page_sizes);
    }

    Ok(())
}
