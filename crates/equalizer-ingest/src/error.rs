use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported document type {0}")]
    WrongType(String),

    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("sample text is empty")]
    EmptyText,

    #[error("document not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
