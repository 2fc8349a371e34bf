//! Health check handler.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub environment: HealthEnvironment,
}

#[derive(Serialize)]
pub struct HealthEnvironment {
    pub transcription_configured: bool,
    pub completion_configured: bool,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        environment: HealthEnvironment {
            transcription_configured: std::env::var("ASSEMBLYAI_API_KEY").is_ok(),
            completion_configured: std::env::var("GROQ_API_KEY").is_ok(),
        },
    })
}
