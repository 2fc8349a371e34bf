//! Text-completion provider HTTP client (Groq chat-completion wire
//! contract), used for transcript translation/reformatting.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::retry::{retry_async, RetryConfig};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// Outcome of a completion call.
///
/// Exhausted retries are an outcome, not an error: the caller owns the
/// job-level fallback decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Text(String),
    Unavailable,
}

/// Boundary to the completion provider.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> ProviderResult<CompletionOutcome>;
}

/// Configuration for the completion client.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Provider base URL
    pub base_url: String,
    /// API key; checked at first use, not at startup
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Bounded-retry policy for transient failures
    pub retry: RetryConfig,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryConfig::new("completion"),
        }
    }
}

impl CompletionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let retry = RetryConfig::new("completion")
            .with_max_attempts(
                std::env::var("COMPLETION_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            )
            .with_base_delay(Duration::from_secs(
                std::env::var("COMPLETION_RETRY_DELAY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ));

        Self {
            base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com".to_string()),
            api_key: std::env::var("GROQ_API_KEY").ok(),
            model: std::env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            timeout: Duration::from_secs(
                std::env::var("COMPLETION_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            retry,
        }
    }
}

/// HTTP client for the completion provider.
pub struct CompletionClient {
    http: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(CompletionConfig::from_env())
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Misconfigured("GROQ_API_KEY is not set".to_string()))
    }

    /// One completion attempt against the provider.
    async fn attempt(&self, key: &str, prompt: &str) -> ProviderResult<String> {
        let url = format!("{}/openai/v1/chat/completions", self.config.base_url);

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 4000,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Completion(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::Completion("empty completion response".to_string()))
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(&self, prompt: &str) -> ProviderResult<CompletionOutcome> {
        // Misconfiguration is not retryable and not an availability issue.
        let key = self.api_key()?.to_string();

        debug!(chars = prompt.len(), "Requesting completion");

        let result = retry_async(&self.config.retry, || self.attempt(&key, prompt)).await;

        match result {
            Ok(text) => Ok(CompletionOutcome::Text(text)),
            Err(e) if e.is_retryable() => {
                warn!(
                    "Completion provider unavailable after {} attempts: {}",
                    self.config.retry.max_attempts, e
                );
                Ok(CompletionOutcome::Unavailable)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, "https://api.groq.com");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_misconfiguration() {
        let client = CompletionClient::new(CompletionConfig::default()).unwrap();
        let err = client.complete("translate this").await.unwrap_err();
        assert!(matches!(err, ProviderError::Misconfigured(_)));
    }
}
