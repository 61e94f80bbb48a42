//! Per-job orchestration.
//!
//! Owns the job state machine: `analyzing -> processing -> completed`,
//! with failure edges into `error` from both non-terminal states. One
//! detached task drives each job; the store is updated after every step so
//! pollers see progress before the next render begins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use clipforge_models::{ClipResult, Job, JobId, JobStatus, SegmentPlan};

use crate::advisor::TimestampAdvisor;
use crate::config::EngineConfig;
use crate::credits::CreditLedger;
use crate::error::{EngineError, EngineResult};
use crate::planner::{self, clamp_clip_length, PlanStrategy};
use crate::probe::DurationProbe;
use crate::render::ClipRenderer;
use crate::store::{JobStore, JobUpdate};

/// One clip-generation request, handed over by the upload boundary.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Owning user (opaque)
    pub owner_id: String,
    /// Uploaded source file; owned by the job from here on
    pub source_path: PathBuf,
    /// Window start override, seconds
    pub window_start: Option<f64>,
    /// Window end override, seconds
    pub window_end: Option<f64>,
    /// Clip length override, seconds (clamped to policy bounds)
    pub clip_length: Option<f64>,
}

impl GenerateRequest {
    pub fn new(owner_id: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            owner_id: owner_id.into(),
            source_path: source_path.into(),
            window_start: None,
            window_end: None,
            clip_length: None,
        }
    }
}

/// Drives jobs from submission to a terminal state.
pub struct JobOrchestrator {
    config: EngineConfig,
    store: Arc<JobStore>,
    probe: Arc<dyn DurationProbe>,
    advisor: Arc<dyn TimestampAdvisor>,
    renderer: Arc<dyn ClipRenderer>,
    ledger: Arc<dyn CreditLedger>,
}

impl JobOrchestrator {
    pub fn new(
        config: EngineConfig,
        store: Arc<JobStore>,
        probe: Arc<dyn DurationProbe>,
        advisor: Arc<dyn TimestampAdvisor>,
        renderer: Arc<dyn ClipRenderer>,
        ledger: Arc<dyn CreditLedger>,
    ) -> Self {
        Self {
            config,
            store,
            probe,
            advisor,
            renderer,
            ledger,
        }
    }

    /// Create the job record and spawn its background task.
    ///
    /// Returns the job ID immediately; the caller must not wait on
    /// completion. From here the spawned task is the only writer for the
    /// job, including cleanup of the uploaded source.
    pub async fn submit(self: &Arc<Self>, request: GenerateRequest) -> EngineResult<JobId> {
        let job = Job::new(&request.owner_id);
        let job_id = job.id.clone();
        self.store.create(job).await?;

        info!(job_id = %job_id, owner_id = %request.owner_id, "Job submitted");

        let this = Arc::clone(self);
        let id = job_id.clone();
        tokio::spawn(async move {
            this.run_job(id, request).await;
        });

        Ok(job_id)
    }

    /// Background task body: process, then settle into a terminal state.
    async fn run_job(&self, job_id: JobId, request: GenerateRequest) {
        let outcome = self.process(&job_id, &request).await;
        self.finish(&job_id, &request, outcome).await;
    }

    /// The non-terminal portion of the state machine.
    async fn process(&self, job_id: &JobId, request: &GenerateRequest) -> EngineResult<()> {
        // analyzing: probe, then plan
        let duration = self
            .probe
            .probe_duration(&request.source_path)
            .await
            .map_err(EngineError::Probe)?;

        info!(job_id = %job_id, duration_secs = duration, "Source probed");

        let plan = self.build_plan(duration, request).await?;
        let total = plan.len() as u32;

        // processing: render segments strictly in plan order, persisting
        // after each so a poller sees every step
        self.store
            .update(
                job_id,
                JobUpdate::new()
                    .status(JobStatus::Processing)
                    .total_clips(total)
                    .progress(0),
            )
            .await?;

        for (i, segment) in plan.iter().enumerate() {
            let index = i as u32;
            let output = self
                .config
                .work_dir
                .join(format!("{}_{}.mp4", job_id, index));

            let rendered = self
                .renderer
                .render(&request.source_path, *segment, &output)
                .await
                .map_err(|source| EngineError::Render { index, source })?;

            let clip = ClipResult {
                id: ClipResult::make_id(job_id.as_str(), index),
                title: ClipResult::make_title(index),
                source_offset_seconds: segment.start_seconds,
                length_seconds: segment.length_seconds,
                output_ref: rendered.output_ref,
                thumbnail_ref: rendered.thumbnail_ref,
            };

            let progress = (((i + 1) as f64 / total as f64) * 100.0).round() as u8;
            self.store
                .update(
                    job_id,
                    JobUpdate::new()
                        .append_clip(clip)
                        .current_clip_index(index + 1)
                        .progress(progress),
                )
                .await?;
        }

        Ok(())
    }

    /// Resolve window defaults and compute the segment plan.
    async fn build_plan(
        &self,
        duration: f64,
        request: &GenerateRequest,
    ) -> EngineResult<SegmentPlan> {
        let window_start = request.window_start.unwrap_or(0.0);
        let window_end = request.window_end.unwrap_or(duration);
        let clip_length =
            clamp_clip_length(request.clip_length.unwrap_or(self.config.default_clip_length));
        let count = self.config.clip_count;

        let plan = match self.config.strategy {
            PlanStrategy::Uniform => {
                planner::plan(duration, window_start, window_end, clip_length, count)?
            }
            PlanStrategy::Advised => {
                let suggestions = self.advisor.suggest(duration, clip_length, count).await;
                planner::plan_advised(
                    duration,
                    window_start,
                    window_end,
                    clip_length,
                    count,
                    &suggestions,
                )?
            }
        };

        Ok(plan)
    }

    /// Terminal transition: persist the outcome, debit on success, and
    /// remove the uploaded source on both paths.
    async fn finish(&self, job_id: &JobId, request: &GenerateRequest, outcome: EngineResult<()>) {
        match outcome {
            Ok(()) => {
                let completed = self
                    .store
                    .update(
                        job_id,
                        JobUpdate::new().status(JobStatus::Completed).progress(100),
                    )
                    .await;

                match completed {
                    Ok(job) => {
                        info!(
                            job_id = %job_id,
                            clips = job.clips.len(),
                            "Job completed"
                        );
                        // The only point where the owner is charged, and
                        // only after the terminal state is persisted.
                        if let Err(e) = self
                            .ledger
                            .debit(&request.owner_id, self.config.credit_cost)
                            .await
                        {
                            warn!(
                                job_id = %job_id,
                                owner_id = %request.owner_id,
                                "Credit debit failed after completion: {}",
                                e
                            );
                        }
                    }
                    Err(e) => {
                        error!(job_id = %job_id, "Failed to persist completion: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!(job_id = %job_id, "Job failed: {}", e);
                let failed = self
                    .store
                    .update(
                        job_id,
                        JobUpdate::new()
                            .status(JobStatus::Error)
                            .error_detail(e.detail()),
                    )
                    .await;
                if let Err(store_err) = failed {
                    error!(job_id = %job_id, "Failed to persist failure: {}", store_err);
                }
            }
        }

        remove_source_file(&request.source_path).await;
    }
}

/// Best-effort removal of the uploaded source. Failure here never masks
/// the job outcome: log and continue.
async fn remove_source_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed source file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove source file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_rounding() {
        // round((i+1)/total * 100) for total = 3
        let p = |done: usize, total: usize| ((done as f64 / total as f64) * 100.0).round() as u8;
        assert_eq!(p(1, 3), 33);
        assert_eq!(p(2, 3), 67);
        assert_eq!(p(3, 3), 100);
    }
}
