use crate::error::{Error, Result};
use lopdf::{Document, ObjectId};
use std::path::Path;
use tracing::debug;

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::LoadFailure(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::LoadFailure(e.to_string()))?;
        debug!(
            bytes = bytes.len(),
            pages = doc.get_pages().len(),
            "loaded PDF"
        );
        Ok(PdfDocument { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Build a new document holding only `pages` (1-based).
    ///
    /// Page objects are carried over untouched, so content, media box and
    /// rotation (including values inherited from the page tree) survive.
    pub fn copy_pages(&self, pages: &[u32]) -> Result<Document> {
        let total = self.page_count();
        for &page in pages {
            if page == 0 || page > total {
                return Err(Error::InvalidPage(format!(
                    "{} is outside 1-{}",
                    page, total
                )));
            }
        }

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| !pages.contains(num))
            .collect();

        let mut new_doc = self.doc.clone();
        // Objects were decrypted on load and the writer does not re-encrypt,
        // so the copy must not claim to be encrypted.
        new_doc.trailer.remove(b"Encrypt");
        new_doc.encryption_state = None;
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }
        new_doc.prune_objects();

        Ok(new_doc)
    }

    /// Serialize a document to an in-memory PDF file
    pub fn save_to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| Error::SaveFailure(e.to_string()))?;
        Ok(buffer)
    }
}
