use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesReportError {
    #[error("Could not decode ledger '{source_name}': {details}")]
    LedgerDecode {
        source_name: String,
        details: String,
    },

    #[error("Unknown platform '{0}': expected Amazon, Flipkart or Meesho")]
    UnknownPlatform(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid region limit {0}: must be at least 1")]
    InvalidRegionLimit(usize),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SalesReportError>;
