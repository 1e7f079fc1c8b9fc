use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftError {
    /// The corpus holds no letters, so there is nothing to partition.
    #[error("corpus contains no letters to partition")]
    EmptyCorpus,

    /// Search settings that cannot drive a search.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Corpus or config file access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv report error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json report error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DraftError>;
