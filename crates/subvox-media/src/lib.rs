//! FFmpeg CLI wrapper for the media stages of the pipeline.
//!
//! Two narrow boundaries are exposed to the worker:
//! - [`AudioExtractor`]: source media -> audio track
//! - [`SubtitleRenderer`]: source video + SRT file -> subtitled video
//!
//! Everything about how the rendering is done (codecs, fonts, filter
//! escaping) stays inside this crate.

pub mod audio;
pub mod command;
pub mod error;
pub mod subtitles;

pub use audio::{AudioExtractor, FfmpegAudioExtractor};
pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use subtitles::{FfmpegSubtitleRenderer, SubtitleRenderer};
