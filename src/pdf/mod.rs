pub mod document;
pub mod info;
pub mod split;

#[cfg(test)]
pub mod test_support;

pub use document::PdfDocument;
