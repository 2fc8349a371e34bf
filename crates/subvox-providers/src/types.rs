//! Wire types for the provider APIs.

use serde::{Deserialize, Serialize};

/// Handle returned by a successful media upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandle(pub String);

impl UploadHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Handle identifying a submitted transcript on the provider side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptHandle(pub String);

impl TranscriptHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranscriptRequest<'a> {
    pub audio_url: &'a str,
    pub speech_model: &'a str,
    pub language_detection: bool,
    pub punctuate: bool,
    pub format_text: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptSubmitResponse {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptStatusResponse {
    pub status: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}
