//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::health::health;
use crate::handlers::jobs::{delete_job, download_srt, download_video, get_status, list_jobs};
use crate::handlers::submit::{index, submit_media};
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Headroom on top of the configured file cap for multipart framing and
/// the option fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(submit_media))
        .route("/status/:job_id", get(get_status))
        .route("/download/:job_id", get(download_video))
        .route("/download/:job_id/srt", get(download_srt))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:job_id", delete(delete_job))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
