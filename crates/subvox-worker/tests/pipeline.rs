//! Lifecycle tests with scripted collaborator doubles.
//!
//! All tests run on a paused clock, so the polling stage's sleeps advance
//! virtual time instead of wall-clock time.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use subvox_media::{AudioExtractor, MediaError, MediaResult, SubtitleRenderer};
use subvox_models::{JobId, JobStatus, ProcessingOptions};
use subvox_providers::{
    Completer, CompletionOutcome, PollOutcome, ProviderError, ProviderResult, Transcriber,
    TranscriptHandle, TranscriptOptions, UploadHandle,
};
use subvox_store::JobStore;
use subvox_worker::{Dispatcher, WorkerConfig, WorkerContext};

const HELLO_SRT: &str = "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n";

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

/// Transcriber double that reports completion on the k-th poll.
struct ScriptedTranscriber {
    completes_on_poll: Option<usize>,
    fail_reason: Option<String>,
    text: String,
    polls: AtomicUsize,
}

impl ScriptedTranscriber {
    fn completes_on(k: usize, text: &str) -> Self {
        Self {
            completes_on_poll: Some(k),
            fail_reason: None,
            text: text.to_string(),
            polls: AtomicUsize::new(0),
        }
    }

    fn never_completes() -> Self {
        Self {
            completes_on_poll: None,
            fail_reason: None,
            text: String::new(),
            polls: AtomicUsize::new(0),
        }
    }

    fn fails_with(reason: &str) -> Self {
        Self {
            completes_on_poll: None,
            fail_reason: Some(reason.to_string()),
            text: String::new(),
            polls: AtomicUsize::new(0),
        }
    }

    fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn upload(&self, _audio: Vec<u8>) -> ProviderResult<UploadHandle> {
        Ok(UploadHandle("https://cdn.test/audio".to_string()))
    }

    async fn submit(
        &self,
        _upload: &UploadHandle,
        _options: &TranscriptOptions,
    ) -> ProviderResult<TranscriptHandle> {
        Ok(TranscriptHandle("tr_test".to_string()))
    }

    async fn poll(&self, _transcript: &TranscriptHandle) -> ProviderResult<PollOutcome> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(reason) = &self.fail_reason {
            return Ok(PollOutcome::Failed(reason.clone()));
        }
        match self.completes_on_poll {
            Some(k) if n >= k => Ok(PollOutcome::Completed(self.text.clone())),
            _ => Ok(PollOutcome::Pending),
        }
    }
}

/// Completer double with a fixed response.
enum StubCompleter {
    Translates,
    Unavailable,
    Misconfigured,
}

#[async_trait]
impl Completer for StubCompleter {
    async fn complete(&self, prompt: &str) -> ProviderResult<CompletionOutcome> {
        match self {
            StubCompleter::Translates => Ok(CompletionOutcome::Text(format!(
                "TRANSLATED::{}",
                prompt.len()
            ))),
            StubCompleter::Unavailable => Ok(CompletionOutcome::Unavailable),
            StubCompleter::Misconfigured => Err(ProviderError::Misconfigured(
                "GROQ_API_KEY is not set".to_string(),
            )),
        }
    }
}

/// Extractor double that produces a small fake audio file.
struct StubExtractor;

#[async_trait]
impl AudioExtractor for StubExtractor {
    async fn extract(&self, _source: &Path, dest: &Path) -> MediaResult<()> {
        tokio::fs::write(dest, b"fake-audio").await?;
        Ok(())
    }
}

struct FailingExtractor;

#[async_trait]
impl AudioExtractor for FailingExtractor {
    async fn extract(&self, _source: &Path, _dest: &Path) -> MediaResult<()> {
        Err(MediaError::ffmpeg_failed("no audio stream", Some(1)))
    }
}

/// Renderer double that writes the output file.
struct StubRenderer {
    fail: bool,
    calls: AtomicUsize,
}

impl StubRenderer {
    fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SubtitleRenderer for StubRenderer {
    async fn render(&self, _video: &Path, subtitles: &Path, dest: &Path) -> MediaResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MediaError::ffmpeg_failed("render exploded", Some(1)));
        }
        assert!(subtitles.exists(), "renderer must receive the SRT on disk");
        tokio::fs::write(dest, b"fake-video").await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    store: Arc<JobStore>,
    dispatcher: Dispatcher,
    _dirs: TempDir,
}

fn harness(
    transcriber: Arc<dyn Transcriber>,
    completer: Arc<dyn Completer>,
    audio: Arc<dyn AudioExtractor>,
    renderer: Arc<dyn SubtitleRenderer>,
) -> Harness {
    let dirs = TempDir::new().unwrap();
    let store = Arc::new(JobStore::new());
    let config = WorkerConfig {
        poll_interval: Duration::from_secs(5),
        poll_budget: Duration::from_secs(20),
        work_dir: dirs.path().join("temp"),
        processed_dir: dirs.path().join("processed"),
    };
    let ctx = Arc::new(WorkerContext {
        config,
        store: Arc::clone(&store),
        transcriber,
        completer,
        audio,
        renderer,
    });
    Harness {
        store,
        dispatcher: Dispatcher::new(ctx),
        _dirs: dirs,
    }
}

async fn wait_terminal(store: &JobStore, id: &JobId) -> subvox_models::Job {
    loop {
        let job = store.get(id).unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn clip_completes_on_second_poll_with_exact_transcript() {
    let transcriber = Arc::new(ScriptedTranscriber::completes_on(2, HELLO_SRT));
    let h = harness(
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let id = h
        .dispatcher
        .submit("clip.mp4", "/tmp/clip.mp4", ProcessingOptions::default());
    assert_eq!(h.store.get(&id).unwrap().filename, "clip.mp4");

    let job = wait_terminal(&h.store, &id).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.transcript.as_deref(), Some(HELLO_SRT));
    assert_eq!(transcriber.poll_count(), 2);
    assert!(job.output_path.is_none(), "no burn-in requested");
}

#[tokio::test(start_paused = true)]
async fn poll_completing_at_any_attempt_within_budget_succeeds() {
    // Budget 20s at 5s cadence allows probes at t=0,5,10,15.
    for k in 1..=4 {
        let transcriber = Arc::new(ScriptedTranscriber::completes_on(k, HELLO_SRT));
        let h = harness(
            Arc::clone(&transcriber) as Arc<dyn Transcriber>,
            Arc::new(StubCompleter::Translates),
            Arc::new(StubExtractor),
            Arc::new(StubRenderer::ok()),
        );

        let id = h
            .dispatcher
            .submit("clip.mp4", "/tmp/clip.mp4", ProcessingOptions::default());
        let job = wait_terminal(&h.store, &id).await;

        assert_eq!(job.status, JobStatus::Completed, "k={k}");
        assert_eq!(transcriber.poll_count(), k, "k={k}");
    }
}

#[tokio::test(start_paused = true)]
async fn never_completing_provider_times_out_with_timeout_kind_error() {
    let transcriber = Arc::new(ScriptedTranscriber::never_completes());
    let h = harness(
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let id = h
        .dispatcher
        .submit("clip.mp4", "/tmp/clip.mp4", ProcessingOptions::default());
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    let detail = job.error_detail.unwrap();
    assert!(detail.contains("timed out"), "detail: {detail}");
    assert!(detail.contains("20 seconds"), "detail: {detail}");
    // The full budget was used: probes at t=0,5,10,15 and none after.
    assert_eq!(transcriber.poll_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn provider_reported_failure_aborts_without_waiting_for_budget() {
    let transcriber = Arc::new(ScriptedTranscriber::fails_with("audio too quiet"));
    let h = harness(
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let id = h
        .dispatcher
        .submit("clip.mp4", "/tmp/clip.mp4", ProcessingOptions::default());
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(job.error_detail.unwrap().contains("audio too quiet"));
    assert_eq!(transcriber.poll_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn audio_extraction_failure_fails_the_job() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(FailingExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let id = h
        .dispatcher
        .submit("clip.mp4", "/tmp/clip.mp4", ProcessingOptions::default());
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(job.error_detail.unwrap().contains("no audio stream"));
}

#[tokio::test(start_paused = true)]
async fn translation_replaces_transcript_when_provider_answers() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let options = ProcessingOptions {
        target_language: Some("English".to_string()),
        burn_in: false,
    };
    let id = h.dispatcher.submit("clip.mp4", "/tmp/clip.mp4", options);
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.transcript.unwrap().starts_with("TRANSLATED::"));
    assert_eq!(job.message, "Processing completed successfully");
}

#[tokio::test(start_paused = true)]
async fn unavailable_translation_degrades_to_original_transcript() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Unavailable),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let options = ProcessingOptions {
        target_language: Some("English".to_string()),
        burn_in: false,
    };
    let id = h.dispatcher.submit("clip.mp4", "/tmp/clip.mp4", options);
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.transcript.as_deref(), Some(HELLO_SRT));
    assert!(job.message.contains("translation unavailable"));
}

#[tokio::test(start_paused = true)]
async fn misconfigured_completion_provider_fails_the_job() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Misconfigured),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let options = ProcessingOptions {
        target_language: Some("English".to_string()),
        burn_in: false,
    };
    let id = h.dispatcher.submit("clip.mp4", "/tmp/clip.mp4", options);
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(job.error_detail.unwrap().contains("GROQ_API_KEY"));
}

#[tokio::test(start_paused = true)]
async fn burn_in_invokes_renderer_once_and_records_output() {
    let renderer = Arc::new(StubRenderer::ok());
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::clone(&renderer) as Arc<dyn SubtitleRenderer>,
    );

    let options = ProcessingOptions {
        target_language: None,
        burn_in: true,
    };
    let id = h.dispatcher.submit("clip.mp4", "/tmp/clip.mp4", options);
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    let output = job.output_path.expect("output recorded");
    assert!(output.ends_with(format!("{id}_with_subtitles.mp4")));
    assert!(output.exists());
}

#[tokio::test(start_paused = true)]
async fn renderer_failure_fails_the_job() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::failing()),
    );

    let options = ProcessingOptions {
        target_language: None,
        burn_in: true,
    };
    let id = h.dispatcher.submit("clip.mp4", "/tmp/clip.mp4", options);
    let job = wait_terminal(&h.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(job.error_detail.unwrap().contains("render exploded"));
    // Transcript survived the failed embedding stage.
    assert_eq!(job.transcript.as_deref(), Some(HELLO_SRT));
}

#[tokio::test(start_paused = true)]
async fn observed_statuses_never_go_backwards() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(3, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let options = ProcessingOptions {
        target_language: Some("English".to_string()),
        burn_in: true,
    };
    let id = h.dispatcher.submit("clip.mp4", "/tmp/clip.mp4", options);

    let mut observed = vec![h.store.get(&id).unwrap().status];
    loop {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = h.store.get(&id).unwrap().status;
        if *observed.last().unwrap() != status {
            observed.push(status);
        }
        if status.is_terminal() {
            break;
        }
    }

    assert_eq!(observed.first(), Some(&JobStatus::Queued));
    assert_eq!(observed.last(), Some(&JobStatus::Completed));
    for pair in observed.windows(2) {
        assert!(
            pair[1].stage_index() > pair[0].stage_index(),
            "went backwards: {:?}",
            observed
        );
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_submissions_get_distinct_isolated_jobs() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(2, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let n = 6;
    let ids: Vec<JobId> = (0..n)
        .map(|i| {
            h.dispatcher.submit(
                format!("clip{i}.mp4"),
                format!("/tmp/clip{i}.mp4"),
                ProcessingOptions::default(),
            )
        })
        .collect();

    let distinct: std::collections::HashSet<_> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(distinct.len(), n);

    for (i, id) in ids.iter().enumerate() {
        let job = wait_terminal(&h.store, id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.filename, format!("clip{i}.mp4"));
        assert_eq!(job.transcript.as_deref(), Some(HELLO_SRT));
    }
}

#[tokio::test(start_paused = true)]
async fn deleting_job_mid_flight_abandons_the_worker_quietly() {
    let h = harness(
        Arc::new(ScriptedTranscriber::never_completes()),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let id = h
        .dispatcher
        .submit("clip.mp4", "/tmp/clip.mp4", ProcessingOptions::default());

    // Let the worker reach the polling stage, then pull the record away.
    loop {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if h.store.get(&id).unwrap().status == JobStatus::Transcribing {
            break;
        }
    }
    h.store.delete(&id).unwrap();

    // Worker runs to its timeout, finds the record gone, and stops.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(h.store.get(&id).is_err());
    assert!(h.store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn dispatcher_prunes_finished_worker_handles() {
    let h = harness(
        Arc::new(ScriptedTranscriber::completes_on(1, HELLO_SRT)),
        Arc::new(StubCompleter::Translates),
        Arc::new(StubExtractor),
        Arc::new(StubRenderer::ok()),
    );

    let first = h
        .dispatcher
        .submit("a.mp4", "/tmp/a.mp4", ProcessingOptions::default());
    wait_terminal(&h.store, &first).await;
    // Give the finished task a tick to be observably done.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!h.dispatcher.is_active(&first));

    h.dispatcher
        .submit("b.mp4", "/tmp/b.mp4", ProcessingOptions::default());
    assert_eq!(h.dispatcher.worker_count(), 1);
}
