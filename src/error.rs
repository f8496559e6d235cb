use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lookup returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

pub type Result<T> = std::result::Result<T, LookupError>;

/// Reasons a single table row is dropped during extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row has {0} cells, expected at least 8")]
    TooFewCells(usize),

    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),
}
