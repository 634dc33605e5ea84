use crate::common::FrontmatterError;
use thiserror::Error;

/// Errors raised by [`RankStore`](super::RankStore) implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid record id '{0}'")]
    InvalidId(String),

    #[error("Frontmatter error in {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: FrontmatterError,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound(id.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StoreError::Unavailable(msg.into())
    }
}
