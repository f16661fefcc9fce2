use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No binary data found under property '{property}'")]
    MissingInput { property: String },

    #[error("Failed to load PDF: {0}")]
    LoadFailure(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Invalid page number: {0}")]
    InvalidPage(String),

    #[error("Chunk size must be a positive integer, got {0}")]
    InvalidChunkSize(i64),

    #[error("Failed to save PDF: {0}")]
    SaveFailure(String),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A failure tied to the input item that produced it.
#[derive(Error, Debug)]
#[error("Item {item_index}: {source}")]
pub struct ItemError {
    pub item_index: usize,
    #[source]
    pub source: Error,
}
