/// Error types for dataset loading
use thiserror::Error;

/// Failure to turn a raw dataset into records.
///
/// Only whole-dataset problems end up here. Individual bad rows are skipped
/// (or read as zero) and logged by the loaders instead.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse JSON data
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A required column is absent from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Failed to read the source
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Remote source answered with an error
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    /// Failed to decompress data
    #[error("Failed to decompress data: {0}")]
    Decompression(String),
}

/// Type alias for Results using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
