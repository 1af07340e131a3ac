use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the usage dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// An input file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The usage log could not be read as CSV.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The category file is not valid JSON.
    #[error("malformed JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A required column is absent from the usage log header.
    #[error("usage log has no `{0}` column")]
    MissingColumn(String),

    /// The category document parsed as JSON but does not have the expected shape.
    #[error("invalid category map: {0}")]
    InvalidCategoryMap(String),

    /// Terminal setup, drawing or restore failed.
    #[error("terminal: {0}")]
    Terminal(#[source] std::io::Error),

    /// A setting has an unusable value.
    #[error("configuration: {0}")]
    Config(String),

    /// I/O failure with no file path attached.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
