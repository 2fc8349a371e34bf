//! Job status, listing, deletion, and artifact download handlers.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::info;

use subvox_models::{Job, JobId, JobStatus};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Job status response.
#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
    pub filename: String,
    pub created_at: String,
    pub updated_at: String,
    pub transcript_ready: bool,
    pub video_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srt_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        let srt_url = job
            .transcript_ready()
            .then(|| format!("/download/{}/srt", job.id));
        let download_url = job.video_ready().then(|| format!("/download/{}", job.id));

        Self {
            job_id: job.id.to_string(),
            status: job.status,
            message: job.message,
            filename: job.filename,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            transcript_ready: srt_url.is_some(),
            video_ready: download_url.is_some(),
            error_detail: job.error_detail,
            srt_url,
            download_url,
        }
    }
}

/// GET /status/:job_id
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = state.store.get(&JobId::from_string(job_id))?;
    Ok(Json(job.into()))
}

/// Job list response.
#[derive(Serialize)]
pub struct JobListResponse {
    pub total_jobs: usize,
    pub jobs: Vec<JobStatusResponse>,
}

/// GET /jobs
pub async fn list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    let jobs: Vec<JobStatusResponse> = state.store.list().into_iter().map(Into::into).collect();
    Json(JobListResponse {
        total_jobs: jobs.len(),
        jobs,
    })
}

/// Delete response.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// DELETE /jobs/:job_id
///
/// Removes the record and its on-disk artifacts. Does not cancel an
/// in-flight worker; an orphaned worker stops at its next store commit.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = JobId::from_string(job_id);
    let job = state.store.delete(&id)?;

    tokio::fs::remove_file(&job.source_path).await.ok();
    if let Some(output) = &job.output_path {
        tokio::fs::remove_file(output).await.ok();
    }
    let srt_path = state.worker_config.processed_dir.join(format!("{id}.srt"));
    tokio::fs::remove_file(srt_path).await.ok();

    info!(%id, "Deleted job and artifacts");

    Ok(Json(DeleteResponse {
        message: format!("Job {id} deleted successfully"),
    }))
}

/// GET /download/:job_id/srt
///
/// The transcript is available from the moment transcription finishes;
/// earlier requests are rejected as not-yet-ready, never as not-found.
pub async fn download_srt(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let id = JobId::from_string(job_id);
    let job = state.store.get(&id)?;

    let transcript = job
        .transcript
        .ok_or_else(|| ApiError::not_ready("Transcript is not ready yet"))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{id}.srt\""),
            ),
        ],
        transcript,
    )
        .into_response())
}

/// GET /download/:job_id
///
/// The rendered video exists only for completed jobs that requested
/// burn-in.
pub async fn download_video(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let id = JobId::from_string(job_id);
    let job = state.store.get(&id)?;

    if !job.options.burn_in {
        return Err(ApiError::bad_request(
            "Subtitle embedding was not requested for this job",
        ));
    }
    if !job.video_ready() {
        return Err(ApiError::not_ready("Processing is not completed yet"));
    }

    let output_path = job
        .output_path
        .ok_or_else(|| ApiError::not_found("Processed video file not found"))?;
    let bytes = tokio::fs::read(&output_path)
        .await
        .map_err(|_| ApiError::not_found("Processed video file not found"))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "video/mp4".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{id}_with_subtitles.mp4\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
