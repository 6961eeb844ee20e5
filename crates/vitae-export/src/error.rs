use thiserror::Error;

/// Failures while writing a report to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Output directory or file could not be created or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer rejected a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias for export results.
pub type Result<T> = std::result::Result<T, ExportError>;
