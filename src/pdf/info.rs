//! Document and page metadata.
//!
//! Only the page count is authoritative. Every other field is fetched on its
//! own and degrades to `None` when it is missing or malformed.

use crate::pdf::PdfDocument;
use anyhow::{anyhow, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Display;
use tracing::debug;

/// US Letter, in points
const DEFAULT_PAGE_WIDTH: f64 = 612.0;
const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub page_count: u32,
    pub metadata: DocumentMetadata,
    pub technical_info: TechnicalInfo,
    pub page_statistics: PageStatistics,
    pub page_details: Vec<PageDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub keywords: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalInfo {
    pub encrypted: Option<bool>,
    pub has_form: Option<bool>,
    pub pdf_version: String,
    pub file_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    pub rotation: i64,
}

impl PageDetails {
    fn new(page_number: u32, width: f64, height: f64, rotation: i64) -> Self {
        let width = round2(width);
        let height = round2(height);
        PageDetails {
            page_number,
            width,
            height,
            orientation: if width > height {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            },
            rotation,
        }
    }

    fn fallback(page_number: u32) -> Self {
        Self::new(page_number, DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStatistics {
    pub landscape_pages: usize,
    pub portrait_pages: usize,
    pub rotated_pages: usize,
    pub unique_page_sizes: usize,
    pub uniform_page_size: bool,
}

impl PageStatistics {
    pub fn from_pages(pages: &[PageDetails]) -> Self {
        let landscape_pages = pages
            .iter()
            .filter(|p| p.orientation == Orientation::Landscape)
            .count();
        let sizes: BTreeSet<String> = pages
            .iter()
            .map(|p| format!("{}x{}", p.width, p.height))
            .collect();

        PageStatistics {
            landscape_pages,
            portrait_pages: pages.len() - landscape_pages,
            rotated_pages: pages.iter().filter(|p| p.rotation != 0).count(),
            unique_page_sizes: sizes.len(),
            uniform_page_size: sizes.len() <= 1,
        }
    }
}

/// Collect everything we can learn about `doc` without touching page content.
pub fn extract(doc: &PdfDocument, raw: &[u8]) -> DocumentInfo {
    let page_count = doc.page_count();
    let pdf = &doc.doc;

    let metadata = DocumentMetadata {
        title: optional("title", || info_string(pdf, b"Title")),
        author: optional("author", || info_string(pdf, b"Author")),
        subject: optional("subject", || info_string(pdf, b"Subject")),
        creator: optional("creator", || info_string(pdf, b"Creator")),
        producer: optional("producer", || info_string(pdf, b"Producer")),
        keywords: optional("keywords", || info_string(pdf, b"Keywords")),
        creation_date: optional("creationDate", || -> Result<_> {
            Ok(info_string(pdf, b"CreationDate")?.map(|d| format_pdf_date(&d)))
        }),
        modification_date: optional("modificationDate", || -> Result<_> {
            Ok(info_string(pdf, b"ModDate")?.map(|d| format_pdf_date(&d)))
        }),
    };

    let technical_info = TechnicalInfo {
        encrypted: Some(pdf.trailer.get(b"Encrypt").is_ok()),
        has_form: optional("hasForm", || has_form(pdf).map(Some)),
        pdf_version: pdf.version.clone(),
        file_size: raw.len(),
    };

    let page_details = match page_details(doc) {
        Ok(pages) => pages,
        Err(e) => {
            debug!(error = %e, "page inspection failed, using default page geometry");
            (1..=page_count).map(PageDetails::fallback).collect()
        }
    };

    DocumentInfo {
        page_count,
        metadata,
        technical_info,
        page_statistics: PageStatistics::from_pages(&page_details),
        page_details,
    }
}

/// Run one fallible lookup, mapping any failure to an absent value.
fn optional<T, E: Display>(
    name: &str,
    fetch: impl FnOnce() -> std::result::Result<Option<T>, E>,
) -> Option<T> {
    match fetch() {
        Ok(value) => value,
        Err(e) => {
            debug!(field = name, error = %e, "metadata field unavailable");
            None
        }
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn info_dictionary(doc: &Document) -> Result<Option<&Dictionary>> {
    match doc.trailer.get(b"Info") {
        Ok(obj) => Ok(Some(resolve(doc, obj)?.as_dict()?)),
        Err(_) => Ok(None),
    }
}

fn info_string(doc: &Document, key: &[u8]) -> Result<Option<String>> {
    let Some(dict) = info_dictionary(doc)? else {
        return Ok(None);
    };
    let Ok(value) = dict.get(key) else {
        return Ok(None);
    };
    match resolve(doc, value)? {
        Object::String(bytes, _) => Ok(decode_pdf_string(bytes)),
        other => Err(anyhow!("expected a string, got {:?}", other)),
    }
}

fn has_form(doc: &Document) -> Result<bool> {
    let catalog = doc.catalog()?;
    let Ok(acro_form) = catalog.get(b"AcroForm") else {
        return Ok(false);
    };
    let acro_form = resolve(doc, acro_form)?.as_dict()?;
    match acro_form.get(b"Fields") {
        Ok(fields) => Ok(!resolve(doc, fields)?.as_array()?.is_empty()),
        Err(_) => Ok(false),
    }
}

fn page_details(doc: &PdfDocument) -> Result<Vec<PageDetails>> {
    doc.page_ids()
        .into_iter()
        .map(|(page_number, page_id)| -> Result<PageDetails> {
            let media_box = inherited(&doc.doc, page_id, b"MediaBox")?
                .ok_or_else(|| anyhow!("page {} has no MediaBox", page_number))?;
            let media_box = resolve(&doc.doc, media_box)?.as_array()?;
            if media_box.len() != 4 {
                return Err(anyhow!(
                    "page {} MediaBox has {} entries",
                    page_number,
                    media_box.len()
                ));
            }
            let coords = media_box
                .iter()
                .map(|obj| number(resolve(&doc.doc, obj)?))
                .collect::<Result<Vec<f64>>>()?;

            let rotation = inherited(&doc.doc, page_id, b"Rotate")
                .ok()
                .flatten()
                .and_then(|obj| resolve(&doc.doc, obj).ok())
                .and_then(|obj| obj.as_i64().ok())
                .map(|r| r.rem_euclid(360))
                .unwrap_or(0);

            Ok(PageDetails::new(
                page_number,
                (coords[2] - coords[0]).abs(),
                (coords[3] - coords[1]).abs(),
                rotation,
            ))
        })
        .collect()
}

/// Look up a page attribute, walking up the page tree through `Parent`.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(current)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => current = parent.as_reference()?,
            Err(_) => return Ok(None),
        }
    }
    Err(anyhow!("page tree deeper than {} levels", MAX_TREE_DEPTH))
}

fn number(obj: &Object) -> Result<f64> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(*r as f64),
        other => Err(anyhow!("expected a number, got {:?}", other)),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    // Check for UTF-16 BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        // Latin-1 / PDFDocEncoding (simplified)
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}

/// Turn `D:YYYYMMDDHHmmSS...` into `YYYY-MM-DDTHH:mm:SS`, or return it as-is.
pub fn format_pdf_date(date: &str) -> String {
    let d = date.strip_prefix("D:").unwrap_or(date);
    if d.len() < 8 || !d.is_char_boundary(8) || !d[..8].bytes().all(|b| b.is_ascii_digit()) {
        return date.to_string();
    }

    let (year, month, day) = (&d[0..4], &d[4..6], &d[6..8]);
    let time = d.get(8..14).filter(|t| t.bytes().all(|b| b.is_ascii_digit()));
    match time {
        Some(t) => format!(
            "{}-{}-{}T{}:{}:{}",
            year,
            month,
            day,
            &t[0..2],
            &t[2..4],
            &t[4..6]
        ),
        None => format!("{}-{}-{}", year, month, day),
    }
}
