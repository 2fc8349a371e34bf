//! Audio extraction from source media.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Boundary the worker uses to pull the audio track out of a submission.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, source: &Path, dest: &Path) -> MediaResult<()>;
}

/// Extracts audio with a single FFmpeg pass to MP3.
#[derive(Debug, Default)]
pub struct FfmpegAudioExtractor;

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    async fn extract(&self, source: &Path, dest: &Path) -> MediaResult<()> {
        info!(source = %source.display(), dest = %dest.display(), "Extracting audio");

        let cmd = FfmpegCommand::new(source, dest)
            .no_video()
            .audio_codec("libmp3lame")
            .output_args(["-q:a", "2"]);

        FfmpegRunner::new().run(&cmd).await
    }
}
