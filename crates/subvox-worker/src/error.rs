//! Worker error types.

use subvox_models::InvalidTransition;
use thiserror::Error;

pub type StageResult<T> = Result<T, StageError>;

/// Failure of a pipeline stage, rendered into the owning job's
/// `error_detail`.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("transcription timed out after {0} seconds")]
    PollTimeout(u64),

    #[error(transparent)]
    Provider(#[from] subvox_providers::ProviderError),

    #[error(transparent)]
    Media(#[from] subvox_media::MediaError),

    #[error(transparent)]
    Store(#[from] subvox_store::StoreError),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// Budget exhaustion is reported distinctly from provider failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StageError::PollTimeout(_))
    }
}
