//! In-memory job store.
//!
//! Single-process system of record for job state. Concurrent writers to
//! distinct records never interfere; the orchestrator is the sole writer
//! for any given job, while pollers read snapshots.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use clipforge_models::{ClipResult, Job, JobId, JobStatus};

/// Job store errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Job already exists: {0}")]
    Duplicate(JobId),

    #[error("Job {id} is terminal ({status}); refusing status change")]
    Terminal { id: JobId, status: JobStatus },
}

/// Partial update applied to a job record.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub current_clip_index: Option<u32>,
    pub total_clips: Option<u32>,
    pub append_clip: Option<ClipResult>,
    pub error_detail: Option<String>,
}

impl JobUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress.min(100));
        self
    }

    pub fn current_clip_index(mut self, index: u32) -> Self {
        self.current_clip_index = Some(index);
        self
    }

    pub fn total_clips(mut self, total: u32) -> Self {
        self.total_clips = Some(total);
        self
    }

    pub fn append_clip(mut self, clip: ClipResult) -> Self {
        self.append_clip = Some(clip);
        self
    }

    pub fn error_detail(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }
}

/// Keyed storage for job records: create, partial update, point lookup.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job record. Duplicate IDs are rejected.
    pub async fn create(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::Duplicate(job.id.clone()));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Fetch a snapshot of a job record.
    pub async fn get(&self, id: &JobId) -> Result<Job, StoreError> {
        let jobs = self.jobs.read().await;
        jobs.get(id).cloned().ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Apply a partial update to a job record.
    ///
    /// A terminal job never moves back to a non-terminal state: updates
    /// that would change the status of a `completed`/`error` job are
    /// rejected. Re-applying the same terminal status is allowed, so the
    /// call is safe to repeat.
    pub async fn update(&self, id: &JobId, update: JobUpdate) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(status) = update.status {
            if job.status.is_terminal() && status != job.status {
                return Err(StoreError::Terminal {
                    id: id.clone(),
                    status: job.status,
                });
            }
            job.status = status;
        }
        if let Some(progress) = update.progress {
            job.progress = progress;
        }
        if let Some(index) = update.current_clip_index {
            job.current_clip_index = index;
        }
        if let Some(total) = update.total_clips {
            job.total_clips = total;
        }
        if let Some(clip) = update.append_clip {
            job.clips.push(clip);
        }
        if let Some(detail) = update.error_detail {
            job.error_detail = Some(detail);
        }
        job.updated_at = Utc::now();

        Ok(job.clone())
    }
}
