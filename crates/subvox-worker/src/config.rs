//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Pipeline worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Delay between transcript poll probes
    pub poll_interval: Duration,
    /// Overall wall-clock budget for the transcribing stage
    pub poll_budget: Duration,
    /// Directory for intermediate audio files
    pub work_dir: PathBuf,
    /// Directory for finished artifacts (SRT files, rendered videos)
    pub processed_dir: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            poll_budget: Duration::from_secs(300),
            work_dir: PathBuf::from("temp"),
            processed_dir: PathBuf::from("processed"),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("TRANSCRIPTION_POLL_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            poll_budget: Duration::from_secs(
                std::env::var("TRANSCRIPTION_POLL_BUDGET")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("temp")),
            processed_dir: std::env::var("PROCESSED_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("processed")),
        }
    }
}
