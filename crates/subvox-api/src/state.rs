//! Application state.

use std::sync::Arc;

use subvox_store::JobStore;
use subvox_worker::{Dispatcher, StageError, WorkerConfig, WorkerContext};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub worker_config: WorkerConfig,
    pub store: Arc<JobStore>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Assemble state around an existing worker context (tests hand in
    /// contexts wired to doubles).
    pub fn new(config: ApiConfig, ctx: Arc<WorkerContext>) -> Self {
        Self {
            config,
            worker_config: ctx.config.clone(),
            store: Arc::clone(&ctx.store),
            dispatcher: Arc::new(Dispatcher::new(ctx)),
        }
    }

    /// State wired to the real providers and FFmpeg.
    pub fn from_env(config: ApiConfig) -> Result<Self, StageError> {
        let store = Arc::new(JobStore::new());
        let ctx = Arc::new(WorkerContext::from_env(WorkerConfig::from_env(), store)?);
        Ok(Self::new(config, ctx))
    }
}
