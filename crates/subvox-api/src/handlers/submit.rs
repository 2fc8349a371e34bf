//! Media submission handlers.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use subvox_models::ProcessingOptions;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Submission response.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
    pub status_url: String,
}

/// POST /upload
///
/// Accepts a multipart form with a `video` file part and optional
/// `target_language` / `burn_in` text parts. Validation failures reject
/// the request before any job record exists; acceptance returns 202
/// immediately, without waiting for any pipeline stage.
pub async fn submit_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut options = ProcessingOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, &state))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("video") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::validation("No file selected"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| map_multipart_error(e, &state))?;
                file = Some((filename, data.to_vec()));
            }
            Some("target_language") => {
                let language = field
                    .text()
                    .await
                    .map_err(|e| map_multipart_error(e, &state))?;
                let language = language.trim().to_string();
                if !language.is_empty() {
                    options.target_language = Some(language);
                }
            }
            Some("burn_in") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| map_multipart_error(e, &state))?;
                options.burn_in = matches!(value.trim(), "1" | "true" | "yes" | "on");
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::validation("No video file provided"))?;

    let extension = state.config.allowed_extension(&filename).ok_or_else(|| {
        ApiError::validation(format!(
            "Invalid file type. Allowed: {}",
            state.config.extensions_for_display()
        ))
    })?;

    if data.is_empty() {
        return Err(ApiError::validation("Uploaded file is empty"));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "File too large. Maximum size is {}MB",
            state.config.max_upload_mb()
        )));
    }

    // Persist the source before the record exists, so a worker never races
    // a half-written file.
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let source_path = state
        .config
        .upload_dir
        .join(format!("{}.{extension}", Uuid::new_v4()));
    tokio::fs::write(&source_path, &data).await?;

    let job_id = state.dispatcher.submit(&filename, source_path, options);

    info!(%job_id, filename, bytes = data.len(), "Accepted submission");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            job_id: job_id.to_string(),
            status: "queued".to_string(),
            message: "Media uploaded successfully, processing started".to_string(),
            status_url: format!("/status/{job_id}"),
        }),
    ))
}

fn map_multipart_error(e: axum::extract::multipart::MultipartError, state: &AppState) -> ApiError {
    // The body limit surfaces through the multipart stream as a read error.
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!(
            "File too large. Maximum size is {}MB",
            state.config.max_upload_mb()
        ))
    } else {
        ApiError::bad_request(format!("Malformed multipart request: {e}"))
    }
}

/// Service index response.
#[derive(Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: serde_json::Value,
    pub limits: IndexLimits,
}

#[derive(Serialize)]
pub struct IndexLimits {
    pub max_file_size_mb: usize,
    pub supported_formats: Vec<String>,
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let mut formats: Vec<String> = state.config.allowed_extensions.iter().cloned().collect();
    formats.sort_unstable();

    Json(IndexResponse {
        message: "Subvox video subtitle API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: serde_json::json!({
            "POST /upload": "Upload a media file for subtitle processing",
            "GET /status/{job_id}": "Check processing status",
            "GET /download/{job_id}": "Download processed video",
            "GET /download/{job_id}/srt": "Download SRT transcript",
            "GET /jobs": "List jobs",
            "DELETE /jobs/{job_id}": "Delete a job and its artifacts",
            "GET /health": "Health check",
        }),
        limits: IndexLimits {
            max_file_size_mb: state.config.max_upload_mb(),
            supported_formats: formats,
        },
    })
}
