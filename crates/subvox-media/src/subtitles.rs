//! Subtitle burn-in rendering.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Subtitle appearance, kept entirely inside this crate. Mirrors the white
/// 24pt text with a black outline the service has always rendered.
const SUBTITLE_STYLE: &str = "FontSize=24,PrimaryColour=&HFFFFFF&,OutlineColour=&H000000&,Outline=1";

/// Boundary the worker uses to burn subtitles into the source video.
///
/// Invoked at most once per job; long-running and CPU-bound.
#[async_trait]
pub trait SubtitleRenderer: Send + Sync {
    async fn render(&self, video: &Path, subtitles: &Path, dest: &Path) -> MediaResult<()>;
}

/// Renders with FFmpeg's `subtitles` filter, libx264 video and AAC audio.
#[derive(Debug, Default)]
pub struct FfmpegSubtitleRenderer;

#[async_trait]
impl SubtitleRenderer for FfmpegSubtitleRenderer {
    async fn render(&self, video: &Path, subtitles: &Path, dest: &Path) -> MediaResult<()> {
        info!(
            video = %video.display(),
            subtitles = %subtitles.display(),
            dest = %dest.display(),
            "Rendering subtitled video"
        );

        let filter = format!(
            "subtitles='{}':force_style='{}'",
            escape_filter_path(subtitles),
            SUBTITLE_STYLE
        );

        let cmd = FfmpegCommand::new(video, dest)
            .video_filter(filter)
            .video_codec("libx264")
            .audio_codec("aac");

        FfmpegRunner::new().run(&cmd).await
    }
}

/// Escape a path for use inside an FFmpeg filter expression, where `:` and
/// `'` are delimiters.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_escape_plain_path() {
        let path = PathBuf::from("/tmp/processed/job.srt");
        assert_eq!(escape_filter_path(&path), "/tmp/processed/job.srt");
    }

    #[test]
    fn test_escape_filter_delimiters() {
        let path = PathBuf::from("C:/subs/it's.srt");
        assert_eq!(escape_filter_path(&path), "C\\:/subs/it\\'s.srt");
    }

    #[test]
    fn test_render_command_uses_subtitles_filter() {
        let filter = format!(
            "subtitles='{}':force_style='{}'",
            escape_filter_path(Path::new("/p/j.srt")),
            SUBTITLE_STYLE
        );
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4")
            .video_filter(filter)
            .video_codec("libx264")
            .audio_codec("aac");

        let args = cmd.build_args();
        assert!(args.iter().any(|a| a.starts_with("subtitles='/p/j.srt'")));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"aac".to_string()));
    }
}
