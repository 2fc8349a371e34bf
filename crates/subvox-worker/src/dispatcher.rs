//! Job dispatcher.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::info;

use subvox_models::{Job, JobId, ProcessingOptions};

use crate::context::WorkerContext;
use crate::pipeline;

/// Accepts validated submissions and launches one independent worker per
/// job, returning without waiting for any pipeline stage.
///
/// Worker handles are retained so a cancellation path or a concurrency
/// ceiling can be added later without redesign; today there is no ceiling
/// on simultaneously active workers.
pub struct Dispatcher {
    ctx: Arc<WorkerContext>,
    workers: DashMap<JobId, JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<WorkerContext>) -> Self {
        Self {
            ctx,
            workers: DashMap::new(),
        }
    }

    /// Create the job record in `Queued` state and start its worker.
    pub fn submit(
        &self,
        filename: impl Into<String>,
        source_path: impl Into<PathBuf>,
        options: ProcessingOptions,
    ) -> JobId {
        let job = Job::new(filename, source_path, options);
        let id = self.ctx.store.create(job);

        let ctx = Arc::clone(&self.ctx);
        let worker_id = id.clone();
        let handle = tokio::spawn(async move {
            pipeline::run(ctx, worker_id).await;
        });

        self.prune_finished();
        self.workers.insert(id.clone(), handle);

        info!(job_id = %id, active = self.workers.len(), "Dispatched job");
        id
    }

    /// Whether the job's worker is still running.
    pub fn is_active(&self, id: &JobId) -> bool {
        self.workers
            .get(id)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Number of retained worker handles (finished ones are pruned on the
    /// next submission).
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn prune_finished(&self) {
        self.workers.retain(|_, handle| !handle.is_finished());
    }
}
