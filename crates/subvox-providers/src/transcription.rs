//! Speech-to-text provider HTTP client (AssemblyAI v2 wire contract).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::types::{
    TranscriptHandle, TranscriptRequest, TranscriptStatusResponse, TranscriptSubmitResponse,
    UploadHandle, UploadResponse,
};

/// Options forwarded with a transcript submission.
#[derive(Debug, Clone)]
pub struct TranscriptOptions {
    pub language_detection: bool,
    pub punctuate: bool,
    pub format_text: bool,
}

impl Default for TranscriptOptions {
    fn default() -> Self {
        Self {
            language_detection: true,
            punctuate: true,
            format_text: true,
        }
    }
}

/// Outcome of a single poll probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Provider finished; carries the SRT transcript text.
    Completed(String),
    /// Provider reported a terminal failure.
    Failed(String),
    /// Still in progress.
    Pending,
}

/// Boundary to the transcription provider.
///
/// `poll` is a single non-blocking probe; the polling loop and its
/// interval/timeout budget belong to the worker.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn upload(&self, audio: Vec<u8>) -> ProviderResult<UploadHandle>;

    async fn submit(
        &self,
        upload: &UploadHandle,
        options: &TranscriptOptions,
    ) -> ProviderResult<TranscriptHandle>;

    async fn poll(&self, transcript: &TranscriptHandle) -> ProviderResult<PollOutcome>;
}

/// Configuration for the transcription client.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// Provider base URL
    pub base_url: String,
    /// API key; checked at first use, not at startup
    pub api_key: Option<String>,
    /// Per-call timeout for the media upload
    pub upload_timeout: Duration,
    /// Per-call timeout for the transcript submission
    pub submit_timeout: Duration,
    /// Per-call timeout for one poll probe
    pub poll_timeout: Duration,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.assemblyai.com".to_string(),
            api_key: None,
            upload_timeout: Duration::from_secs(60),
            submit_timeout: Duration::from_secs(30),
            poll_timeout: Duration::from_secs(30),
        }
    }
}

impl TranscriptionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let secs = |var: &str, default: u64| {
            Duration::from_secs(
                std::env::var(var)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(default),
            )
        };

        Self {
            base_url: std::env::var("ASSEMBLYAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.assemblyai.com".to_string()),
            api_key: std::env::var("ASSEMBLYAI_API_KEY").ok(),
            upload_timeout: secs("TRANSCRIPTION_UPLOAD_TIMEOUT", 60),
            submit_timeout: secs("TRANSCRIPTION_SUBMIT_TIMEOUT", 30),
            poll_timeout: secs("TRANSCRIPTION_POLL_TIMEOUT", 30),
        }
    }
}

/// HTTP client for the transcription provider.
pub struct TranscriptionClient {
    http: Client,
    config: TranscriptionConfig,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionConfig) -> ProviderResult<Self> {
        let http = Client::builder().build().map_err(ProviderError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(TranscriptionConfig::from_env())
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.config.api_key.as_deref().ok_or_else(|| {
            ProviderError::Misconfigured("ASSEMBLYAI_API_KEY is not set".to_string())
        })
    }
}

#[async_trait]
impl Transcriber for TranscriptionClient {
    async fn upload(&self, audio: Vec<u8>) -> ProviderResult<UploadHandle> {
        let key = self.api_key()?;
        let url = format!("{}/v2/upload", self.config.base_url);

        debug!(bytes = audio.len(), "Uploading audio to transcription provider");

        let response = self
            .http
            .post(&url)
            .header("authorization", key)
            .timeout(self.config.upload_timeout)
            .body(audio)
            .send()
            .await
            .map_err(|e| ProviderError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Upload(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Upload(format!("invalid upload response: {e}")))?;

        Ok(UploadHandle(body.upload_url))
    }

    async fn submit(
        &self,
        upload: &UploadHandle,
        options: &TranscriptOptions,
    ) -> ProviderResult<TranscriptHandle> {
        let key = self.api_key()?;
        let url = format!("{}/v2/transcript", self.config.base_url);

        let request = TranscriptRequest {
            audio_url: upload.as_str(),
            speech_model: "universal",
            language_detection: options.language_detection,
            punctuate: options.punctuate,
            format_text: options.format_text,
        };

        let response = self
            .http
            .post(&url)
            .header("authorization", key)
            .timeout(self.config.submit_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Submission(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Submission(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let body: TranscriptSubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Submission(format!("invalid response: {e}")))?;

        match body.id {
            Some(id) => Ok(TranscriptHandle(id)),
            None => Err(ProviderError::Submission(
                "response missing transcript id".to_string(),
            )),
        }
    }

    async fn poll(&self, transcript: &TranscriptHandle) -> ProviderResult<PollOutcome> {
        let key = self.api_key()?;
        let url = format!(
            "{}/v2/transcript/{}",
            self.config.base_url,
            transcript.as_str()
        );

        let response = self
            .http
            .get(&url)
            .header("authorization", key)
            .timeout(self.config.poll_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Transcript(format!(
                "status probe returned {}",
                response.status()
            )));
        }

        let body: TranscriptStatusResponse = response.json().await?;

        match body.status.as_str() {
            "completed" => {
                let srt = self.fetch_srt(transcript).await?;
                Ok(PollOutcome::Completed(srt))
            }
            "error" => Ok(PollOutcome::Failed(
                body.error
                    .unwrap_or_else(|| "provider reported an error".to_string()),
            )),
            _ => Ok(PollOutcome::Pending),
        }
    }
}

impl TranscriptionClient {
    /// Fetch the finished transcript in SRT form.
    async fn fetch_srt(&self, transcript: &TranscriptHandle) -> ProviderResult<String> {
        let key = self.api_key()?;
        let url = format!(
            "{}/v2/transcript/{}/srt",
            self.config.base_url,
            transcript.as_str()
        );

        let response = self
            .http
            .get(&url)
            .header("authorization", key)
            .timeout(self.config.poll_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Transcript(format!(
                "SRT fetch returned {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TranscriptionConfig::default();
        assert_eq!(config.base_url, "https://api.assemblyai.com");
        assert_eq!(config.upload_timeout, Duration::from_secs(60));
        assert_eq!(config.submit_timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_misconfiguration_at_first_use() {
        let client = TranscriptionClient::new(TranscriptionConfig::default()).unwrap();
        let err = client.upload(vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, ProviderError::Misconfigured(_)));
    }
}
