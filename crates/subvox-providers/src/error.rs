//! Provider error types.

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    Misconfigured(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("transcript submission failed: {0}")]
    Submission(String),

    #[error("transcription failed: {0}")]
    Transcript(String),

    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Network(_) | ProviderError::Completion(_)
        )
    }
}
