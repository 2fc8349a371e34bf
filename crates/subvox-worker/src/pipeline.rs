//! The per-job lifecycle pipeline.
//!
//! One invocation of [`run`] owns one job from `Queued` to a terminal
//! state. Every transition is committed to the store before the next
//! external call begins.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, warn};

use subvox_models::{JobId, JobStatus};
use subvox_providers::{CompletionOutcome, PollOutcome, ProviderError, TranscriptHandle, TranscriptOptions};
use subvox_store::StoreError;

use crate::context::WorkerContext;
use crate::error::{StageError, StageResult};

/// Drive a job through the pipeline. Never panics the worker task: any
/// stage failure is committed to the job record as `Error`.
pub async fn run(ctx: Arc<WorkerContext>, job_id: JobId) {
    info!(%job_id, "Worker started");

    match run_pipeline(&ctx, &job_id).await {
        Ok(()) => info!(%job_id, "Worker finished"),
        Err(StageError::Store(StoreError::NotFound(_))) => {
            // Job was deleted out from under us; nothing left to report to.
            info!(%job_id, "Job deleted mid-flight, abandoning pipeline");
        }
        Err(e) => {
            warn!(%job_id, error = %e, "Pipeline failed");
            let _ = ctx.store.update(&job_id, |job| job.fail(e.to_string()));
        }
    }
}

async fn run_pipeline(ctx: &WorkerContext, id: &JobId) -> StageResult<()> {
    let job = ctx.store.get(id)?;
    let options = job.options;
    let source = job.source_path;

    // Stage: audio extraction.
    commit(ctx, id, JobStatus::ExtractingAudio, "Extracting audio from source media...")?;
    tokio::fs::create_dir_all(&ctx.config.work_dir).await?;
    let audio_path = ctx.config.work_dir.join(format!("{id}.mp3"));
    ctx.audio.extract(&source, &audio_path).await?;

    // Stage: upload + transcript submission, one attempt each.
    commit(ctx, id, JobStatus::UploadingMedia, "Uploading audio to transcription service...")?;
    let audio_bytes = tokio::fs::read(&audio_path).await?;
    let upload = ctx.transcriber.upload(audio_bytes).await?;
    let transcript_handle = ctx
        .transcriber
        .submit(&upload, &TranscriptOptions::default())
        .await?;

    // Stage: poll until the provider is done or the budget runs out.
    commit(ctx, id, JobStatus::Transcribing, "Transcription in progress...")?;
    let srt = poll_transcript(ctx, &transcript_handle).await?;
    tokio::fs::remove_file(&audio_path).await.ok();

    // The raw transcript is downloadable from this point on.
    ctx.store.update(id, |job| job.transcript = Some(srt.clone()))?;

    let mut subtitle_text = srt;
    let mut translation_skipped = false;

    // Stage: optional translation.
    if let Some(language) = &options.target_language {
        commit(
            ctx,
            id,
            JobStatus::Translating,
            format!("Translating subtitles to {language}..."),
        )?;

        let prompt = translation_prompt(&subtitle_text, language);
        match ctx.completer.complete(&prompt).await? {
            CompletionOutcome::Text(translated) => {
                subtitle_text = translated;
                ctx.store
                    .update(id, |job| job.transcript = Some(subtitle_text.clone()))?;
            }
            CompletionOutcome::Unavailable => {
                // Translation is best-effort: keep the untranslated
                // transcript and finish the job instead of failing it.
                warn!(%id, "Completion provider unavailable, keeping original transcript");
                translation_skipped = true;
            }
        }
    }

    tokio::fs::create_dir_all(&ctx.config.processed_dir).await?;
    let srt_path = ctx.config.processed_dir.join(format!("{id}.srt"));
    tokio::fs::write(&srt_path, &subtitle_text).await?;

    // Stage: optional subtitle burn-in, invoked exactly once.
    if options.burn_in {
        commit(ctx, id, JobStatus::Embedding, "Embedding subtitles into video...")?;
        let output_path = ctx
            .config
            .processed_dir
            .join(format!("{id}_with_subtitles.mp4"));
        ctx.renderer.render(&source, &srt_path, &output_path).await?;
        ctx.store
            .update(id, |job| job.output_path = Some(output_path.clone()))?;
    }

    let message = if translation_skipped {
        "Processing completed (translation unavailable, kept original transcript)"
    } else {
        "Processing completed successfully"
    };
    commit(ctx, id, JobStatus::Completed, message)?;

    Ok(())
}

/// Commit a status transition to the store before touching the next
/// external collaborator.
fn commit(
    ctx: &WorkerContext,
    id: &JobId,
    next: JobStatus,
    message: impl Into<String>,
) -> StageResult<()> {
    let message = message.into();
    let mut transition = Ok(());
    ctx.store.update(id, |job| {
        transition = job.transition(next, message);
    })?;
    transition.map_err(StageError::Transition)
}

/// Poll the provider at a fixed interval under an overall wall-clock
/// budget. Probe transport errors are tolerated while budget remains;
/// provider-reported failure aborts immediately.
async fn poll_transcript(
    ctx: &WorkerContext,
    handle: &TranscriptHandle,
) -> StageResult<String> {
    let started = Instant::now();
    let budget = ctx.config.poll_budget;

    loop {
        if started.elapsed() >= budget {
            return Err(StageError::PollTimeout(budget.as_secs()));
        }

        match ctx.transcriber.poll(handle).await {
            Ok(PollOutcome::Completed(text)) => return Ok(text),
            Ok(PollOutcome::Failed(reason)) => {
                return Err(ProviderError::Transcript(reason).into());
            }
            Ok(PollOutcome::Pending) => {}
            Err(e) => {
                if started.elapsed() + ctx.config.poll_interval >= budget {
                    return Err(e.into());
                }
                warn!(error = %e, "Transcript probe failed, retrying on next interval");
            }
        }

        tokio::time::sleep(ctx.config.poll_interval).await;
    }
}

/// Prompt sent to the completion provider for the translation stage.
fn translation_prompt(srt: &str, target_language: &str) -> String {
    format!(
        "Translate the following SRT subtitle content to {target_language}. \
         Maintain the exact SRT format with timestamps and numbering. \
         Only translate the text content, keep all timing information unchanged.\n\n\
         SRT Content:\n{srt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_prompt_carries_language_and_content() {
        let prompt = translation_prompt("1\n00:00:00,000 --> 00:00:01,000\nHola\n\n", "English");
        assert!(prompt.contains("to English"));
        assert!(prompt.contains("Hola"));
        assert!(prompt.contains("keep all timing information unchanged"));
    }
}
