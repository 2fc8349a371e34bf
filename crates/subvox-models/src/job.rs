//! Job definitions and lifecycle states.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ProcessingOptions;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline state of a job.
///
/// States advance forward only, in pipeline order. `Translating` and
/// `Embedding` are optional and may be skipped; `Error` is terminal and
/// reachable from every non-terminal state. The transition table in
/// [`JobStatus::may_transition_to`] is the single source of truth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted, waiting for its worker to begin
    #[default]
    Queued,
    /// Extracting the audio track from the source media
    ExtractingAudio,
    /// Uploading audio to the transcription provider
    UploadingMedia,
    /// Waiting for the transcription provider to finish
    Transcribing,
    /// Translating/reformatting the transcript
    Translating,
    /// Burning subtitles into the source video
    Embedding,
    /// Pipeline finished successfully
    Completed,
    /// Pipeline aborted
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::ExtractingAudio => "extracting_audio",
            JobStatus::UploadingMedia => "uploading_media",
            JobStatus::Transcribing => "transcribing",
            JobStatus::Translating => "translating",
            JobStatus::Embedding => "embedding",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    /// Position in pipeline order, used to assert forward-only progress.
    pub fn stage_index(&self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::ExtractingAudio => 1,
            JobStatus::UploadingMedia => 2,
            JobStatus::Transcribing => 3,
            JobStatus::Translating => 4,
            JobStatus::Embedding => 5,
            JobStatus::Completed => 6,
            JobStatus::Error => 7,
        }
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn may_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;

        if self.is_terminal() {
            return false;
        }
        if next == Error {
            return true;
        }

        matches!(
            (self, next),
            (Queued, ExtractingAudio)
                | (ExtractingAudio, UploadingMedia)
                | (UploadingMedia, Transcribing)
                | (Transcribing, Translating)
                | (Transcribing, Embedding)
                | (Transcribing, Completed)
                | (Translating, Embedding)
                | (Translating, Completed)
                | (Embedding, Completed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempted transition not allowed by the lifecycle table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid job transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// One submission's tracked progress through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Current pipeline state
    pub status: JobStatus,

    /// Human-readable description of the current stage
    pub message: String,

    /// Original filename as submitted
    pub filename: String,

    /// Where the uploaded source file was saved
    pub source_path: PathBuf,

    /// Processing options captured at submission
    pub options: ProcessingOptions,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last transition timestamp
    pub updated_at: DateTime<Utc>,

    /// Final subtitle text, set once transcription (and any translation)
    /// has produced it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    /// Rendered output video, set once embedding has completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Failure detail, set only when status is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl Job {
    /// Create a new job in the `Queued` state.
    pub fn new(
        filename: impl Into<String>,
        source_path: impl Into<PathBuf>,
        options: ProcessingOptions,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Queued,
            message: "Media uploaded successfully, processing queued...".to_string(),
            filename: filename.into(),
            source_path: source_path.into(),
            options,
            created_at: now,
            updated_at: now,
            transcript: None,
            output_path: None,
            error_detail: None,
        }
    }

    /// Advance to `next`, overwriting the stage message.
    ///
    /// Terminal states are frozen; an illegal transition leaves the job
    /// untouched and returns the error.
    pub fn transition(
        &mut self,
        next: JobStatus,
        message: impl Into<String>,
    ) -> Result<(), InvalidTransition> {
        if !self.status.may_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.message = message.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Jump to `Error` with the given detail. No-op once terminal.
    pub fn fail(&mut self, detail: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        let detail = detail.into();
        self.status = JobStatus::Error;
        self.message = format!("Processing failed: {detail}");
        self.error_detail = Some(detail);
        self.updated_at = Utc::now();
    }

    /// Whether the transcript artifact can be downloaded.
    pub fn transcript_ready(&self) -> bool {
        self.transcript.is_some()
    }

    /// Whether the rendered video artifact can be downloaded.
    pub fn video_ready(&self) -> bool {
        self.status == JobStatus::Completed && self.output_path.is_some()
    }
}
