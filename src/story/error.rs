use super::status::StatusError;
use crate::store::StoreError;
use thiserror::Error;

/// Error type for story operations.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Story not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid order {0}. Display order starts at 1")]
    InvalidOrder(u32),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Store(StoreError),
}

impl StoryError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        StoryError::ValidationError(msg.into())
    }
}

impl From<StoreError> for StoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => StoryError::NotFound(id),
            StoreError::InvalidId(id) => {
                StoryError::ValidationError(format!("Invalid story id '{id}'"))
            }
            other => StoryError::Store(other),
        }
    }
}
