use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("{0}")]
    Other(String),
}
