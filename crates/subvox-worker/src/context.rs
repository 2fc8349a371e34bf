//! Shared context for pipeline workers.

use std::sync::Arc;

use subvox_media::{AudioExtractor, FfmpegAudioExtractor, FfmpegSubtitleRenderer, SubtitleRenderer};
use subvox_providers::{CompletionClient, Completer, Transcriber, TranscriptionClient};
use subvox_store::JobStore;

use crate::config::WorkerConfig;
use crate::error::StageResult;

/// Everything a pipeline worker needs: the store it commits transitions
/// into and the external collaborators it sequences.
pub struct WorkerContext {
    pub config: WorkerConfig,
    pub store: Arc<JobStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub completer: Arc<dyn Completer>,
    pub audio: Arc<dyn AudioExtractor>,
    pub renderer: Arc<dyn SubtitleRenderer>,
}

impl WorkerContext {
    /// Context wired to the real providers and FFmpeg, configured from the
    /// environment.
    pub fn from_env(config: WorkerConfig, store: Arc<JobStore>) -> StageResult<Self> {
        Ok(Self {
            config,
            store,
            transcriber: Arc::new(TranscriptionClient::from_env()?),
            completer: Arc::new(CompletionClient::from_env()?),
            audio: Arc::new(FfmpegAudioExtractor),
            renderer: Arc::new(FfmpegSubtitleRenderer),
        })
    }
}
