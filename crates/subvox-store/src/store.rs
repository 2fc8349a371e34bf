//! DashMap-backed job store.

use dashmap::DashMap;
use subvox_models::{Job, JobId};

use crate::error::{StoreError, StoreResult};

/// Registry mapping job id to the last committed job record.
///
/// `update` is atomic per id: the closure runs under that entry's lock, so
/// a concurrent `get` or `list` sees either the record before the mutation
/// or after it, never a half-applied one. Updates to different ids do not
/// block each other.
#[derive(Default)]
pub struct JobStore {
    jobs: DashMap<JobId, Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Insert a freshly created job, returning its id.
    pub fn create(&self, job: Job) -> JobId {
        let id = job.id.clone();
        self.jobs.insert(id.clone(), job);
        id
    }

    /// Snapshot of a single job.
    pub fn get(&self, id: &JobId) -> StoreResult<Job> {
        self.jobs
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Apply a mutation to a job under its entry lock.
    pub fn update<F>(&self, id: &JobId, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Job),
    {
        let mut entry = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        mutate(entry.value_mut());
        Ok(())
    }

    /// Remove a job, returning the removed record so the caller can clean
    /// up its on-disk artifacts.
    pub fn delete(&self, id: &JobId) -> StoreResult<Job> {
        self.jobs
            .remove(id)
            .map(|(_, job)| job)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Point-in-time snapshot of all jobs, newest first.
    pub fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
