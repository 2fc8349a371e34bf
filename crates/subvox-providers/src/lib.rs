//! HTTP clients for the external speech-to-text and text-completion
//! providers.
//!
//! Both clients are pure boundaries: the transcription `poll` is a single
//! probe (the polling loop and its budget live in the worker), and the
//! completion client owns only its internal bounded retry, reporting
//! exhaustion as [`CompletionOutcome::Unavailable`] so the caller decides
//! the job-level fallback.

pub mod completion;
pub mod error;
pub mod retry;
pub mod transcription;
pub mod types;

pub use completion::{Completer, CompletionClient, CompletionConfig, CompletionOutcome};
pub use error::{ProviderError, ProviderResult};
pub use retry::{retry_async, RetryConfig};
pub use transcription::{
    PollOutcome, Transcriber, TranscriptionClient, TranscriptionConfig, TranscriptOptions,
};
pub use types::{TranscriptHandle, UploadHandle};
