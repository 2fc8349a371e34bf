//! API configuration.

use std::collections::HashSet;
use std::path::PathBuf;

const DEFAULT_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "mp3", "wav",
];

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Accepted media file extensions, lowercase
    pub allowed_extensions: HashSet<String>,
    /// Directory uploaded source files are saved to
    pub upload_dir: PathBuf,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: 500 * 1024 * 1024,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            upload_dir: PathBuf::from("uploads"),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(500 * 1024 * 1024),
            allowed_extensions: std::env::var("ALLOWED_EXTENSIONS")
                .map(|s| {
                    s.split(',')
                        .map(|e| e.trim().to_lowercase())
                        .filter(|e| !e.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Extract the extension if the filename carries an allowed one.
    pub fn allowed_extension(&self, filename: &str) -> Option<String> {
        let ext = filename.rsplit_once('.')?.1.to_lowercase();
        self.allowed_extensions.contains(&ext).then_some(ext)
    }

    /// Allowed extensions as a sorted, comma-separated list for messages.
    pub fn extensions_for_display(&self) -> String {
        let mut extensions: Vec<&str> =
            self.allowed_extensions.iter().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions.join(", ")
    }

    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_bytes / (1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_upload_mb(), 500);
        assert!(config.allowed_extensions.contains("mp4"));
        assert!(config.allowed_extensions.contains("wav"));
    }

    #[test]
    fn test_allowed_extension_is_case_insensitive() {
        let config = ApiConfig::default();
        assert_eq!(config.allowed_extension("Clip.MP4").as_deref(), Some("mp4"));
        assert_eq!(config.allowed_extension("song.wav").as_deref(), Some("wav"));
        assert!(config.allowed_extension("malware.exe").is_none());
        assert!(config.allowed_extension("no_extension").is_none());
    }
}
