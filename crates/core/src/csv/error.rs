use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while ingesting a CSV file.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for CSV ingestion.
pub type Result<T> = std::result::Result<T, CsvError>;
