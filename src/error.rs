use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Store {} not found - run an ingest first", path.display())]
    StoreNotFound { path: PathBuf },

    #[error("Store {} has malformed header '{found}' (expected 'datetime,station,temp')", path.display())]
    MalformedHeader { path: PathBuf, found: String },

    #[error("Unparseable snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Station '{requested}' not found. Available: {}", available.join(", "))]
    StationNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Processing cancelled by user")]
    Cancelled,
}
