//! End-to-end orchestrator tests over in-memory collaborator fakes.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use clipforge_engine::{
    ClipRenderer, CreditError, CreditLedger, DurationProbe, EngineConfig, FallbackAdvisor,
    GenerateRequest, JobOrchestrator, JobStore, PlanStrategy, RenderedClip,
};
use clipforge_media::{MediaError, MediaResult};
use clipforge_models::{JobId, JobStatus, Segment};

struct FakeProbe {
    duration: Option<f64>,
}

#[async_trait]
impl DurationProbe for FakeProbe {
    async fn probe_duration(&self, _path: &Path) -> MediaResult<f64> {
        match self.duration {
            Some(d) => Ok(d),
            None => Err(MediaError::ffprobe_failed(
                "Indeterminate duration: corrupt container",
                Some("invalid data found when processing input".to_string()),
            )),
        }
    }
}

struct FakeRenderer {
    fail_at: Option<u32>,
    calls: AtomicU32,
    delay: Duration,
}

impl FakeRenderer {
    fn new() -> Self {
        Self {
            fail_at: None,
            calls: AtomicU32::new(0),
            delay: Duration::from_millis(2),
        }
    }

    fn failing_at(index: u32) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClipRenderer for FakeRenderer {
    async fn render(
        &self,
        _source: &Path,
        _segment: Segment,
        output: &Path,
    ) -> MediaResult<RenderedClip> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if Some(index) == self.fail_at {
            return Err(MediaError::Timeout(180));
        }

        Ok(RenderedClip {
            output_ref: output.to_string_lossy().to_string(),
            thumbnail_ref: output.with_extension("jpg").to_string_lossy().to_string(),
        })
    }
}

#[derive(Default)]
struct RecordingLedger {
    debits: Mutex<Vec<(String, u32)>>,
}

impl RecordingLedger {
    async fn recorded(&self) -> Vec<(String, u32)> {
        self.debits.lock().await.clone()
    }
}

#[async_trait]
impl CreditLedger for RecordingLedger {
    async fn debit(&self, owner_id: &str, amount: u32) -> Result<(), CreditError> {
        self.debits.lock().await.push((owner_id.to_string(), amount));
        Ok(())
    }
}

struct Harness {
    orchestrator: Arc<JobOrchestrator>,
    store: Arc<JobStore>,
    renderer: Arc<FakeRenderer>,
    ledger: Arc<RecordingLedger>,
    work_dir: tempfile::TempDir,
}

fn build_harness(probe: FakeProbe, renderer: FakeRenderer) -> Harness {
    let work_dir = tempfile::TempDir::new().unwrap();
    let config = EngineConfig {
        work_dir: work_dir.path().to_path_buf(),
        strategy: PlanStrategy::Uniform,
        ..EngineConfig::default()
    };

    let store = Arc::new(JobStore::new());
    let renderer = Arc::new(renderer);
    let ledger = Arc::new(RecordingLedger::default());

    let orchestrator = Arc::new(JobOrchestrator::new(
        config,
        Arc::clone(&store),
        Arc::new(probe),
        Arc::new(FallbackAdvisor),
        renderer.clone() as Arc<dyn ClipRenderer>,
        ledger.clone() as Arc<dyn CreditLedger>,
    ));

    Harness {
        orchestrator,
        store,
        renderer,
        ledger,
        work_dir,
    }
}

async fn write_source(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, b"fake video bytes").await.unwrap();
    path
}

async fn wait_for_terminal(store: &JobStore, id: &JobId) -> clipforge_models::Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = store.get(id).await.unwrap();
        if job.is_terminal() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job did not reach a terminal state"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[tokio::test]
async fn completed_job_produces_full_pack_and_single_debit() {
    let harness = build_harness(FakeProbe { duration: Some(600.0) }, FakeRenderer::new());
    let source = write_source(harness.work_dir.path(), "src_a.mp4").await;

    let id = harness
        .orchestrator
        .submit(GenerateRequest::new("owner-1", &source))
        .await
        .unwrap();

    let job = wait_for_terminal(&harness.store, &id).await;

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.total_clips, 10);
    assert_eq!(job.current_clip_index, 10);
    assert_eq!(job.clips.len(), 10);
    assert!(job.error_detail.is_none());

    // Clips keep plan order and are namespaced by job id
    for (i, clip) in job.clips.iter().enumerate() {
        assert_eq!(clip.id, format!("{}-{}", id, i));
        assert!(clip.output_ref.contains(id.as_str()));
    }

    // Exactly one debit, only for the owning user
    assert_eq!(harness.ledger.recorded().await, vec![("owner-1".to_string(), 10)]);

    // Source cleaned up on the terminal transition
    assert!(!source.exists());
}

#[tokio::test]
async fn probe_failure_fails_job_before_any_render() {
    let harness = build_harness(FakeProbe { duration: None }, FakeRenderer::new());
    let source = write_source(harness.work_dir.path(), "src_corrupt.mp4").await;

    let id = harness
        .orchestrator
        .submit(GenerateRequest::new("owner-1", &source))
        .await
        .unwrap();

    let job = wait_for_terminal(&harness.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(job.clips.is_empty());
    assert!(job.progress < 100);
    let detail = job.error_detail.expect("error detail set");
    assert!(detail.contains("Probe failed"));

    assert_eq!(harness.renderer.call_count(), 0);
    assert!(harness.ledger.recorded().await.is_empty());
    assert!(!source.exists());
}

#[tokio::test]
async fn render_failure_aborts_remaining_segments() {
    // Segment index 5 (the sixth clip) times out.
    let harness = build_harness(
        FakeProbe { duration: Some(600.0) },
        FakeRenderer::failing_at(5),
    );
    let source = write_source(harness.work_dir.path(), "src_b.mp4").await;

    let id = harness
        .orchestrator
        .submit(GenerateRequest::new("owner-2", &source))
        .await
        .unwrap();

    let job = wait_for_terminal(&harness.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    // The five successful clips are preserved for diagnostics
    assert_eq!(job.clips.len(), 5);
    assert_eq!(job.current_clip_index, 5);
    assert_eq!(job.progress, 50);
    assert!(job.error_detail.unwrap().contains("clip 5"));

    // No render is attempted past the failure
    assert_eq!(harness.renderer.call_count(), 6);
    assert!(harness.ledger.recorded().await.is_empty());
    assert!(!source.exists());
}

#[tokio::test]
async fn progress_is_monotonic_and_status_never_regresses() {
    let harness = build_harness(FakeProbe { duration: Some(600.0) }, FakeRenderer::new());
    let source = write_source(harness.work_dir.path(), "src_c.mp4").await;

    let id = harness
        .orchestrator
        .submit(GenerateRequest::new("owner-1", &source))
        .await
        .unwrap();

    let mut last_progress = 0u8;
    let mut last_index = 0u32;
    let mut seen_processing = false;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = harness.store.get(&id).await.unwrap();

        assert!(job.progress >= last_progress, "progress regressed");
        assert!(job.current_clip_index >= last_index, "clip index regressed");
        if seen_processing {
            assert_ne!(job.status, JobStatus::Analyzing, "status regressed");
        }
        last_progress = job.progress;
        last_index = job.current_clip_index;
        seen_processing |= job.status == JobStatus::Processing;

        if job.is_terminal() {
            assert_eq!(job.status, JobStatus::Completed);
            assert_eq!(job.progress, 100);
            break;
        }
        assert!(tokio::time::Instant::now() < deadline);
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[tokio::test]
async fn concurrent_jobs_complete_independently() {
    let harness = build_harness(FakeProbe { duration: Some(600.0) }, FakeRenderer::new());
    let source_a = write_source(harness.work_dir.path(), "src_owner_a.mp4").await;
    let source_b = write_source(harness.work_dir.path(), "src_owner_b.mp4").await;

    let id_a = harness
        .orchestrator
        .submit(GenerateRequest::new("owner-a", &source_a))
        .await
        .unwrap();
    let id_b = harness
        .orchestrator
        .submit(GenerateRequest::new("owner-b", &source_b))
        .await
        .unwrap();

    let job_a = wait_for_terminal(&harness.store, &id_a).await;
    let job_b = wait_for_terminal(&harness.store, &id_b).await;

    assert_eq!(job_a.status, JobStatus::Completed);
    assert_eq!(job_b.status, JobStatus::Completed);

    // Each record holds only its own, correctly ordered clips
    for (job, id) in [(&job_a, &id_a), (&job_b, &id_b)] {
        assert_eq!(job.clips.len(), 10);
        for (i, clip) in job.clips.iter().enumerate() {
            assert_eq!(clip.id, format!("{}-{}", id, i));
        }
    }

    // One debit per owner
    let mut debits = harness.ledger.recorded().await;
    debits.sort();
    assert_eq!(
        debits,
        vec![("owner-a".to_string(), 10), ("owner-b".to_string(), 10)]
    );

    assert!(!source_a.exists());
    assert!(!source_b.exists());
}

#[tokio::test]
async fn window_overrides_shape_the_plan() {
    let harness = build_harness(FakeProbe { duration: Some(600.0) }, FakeRenderer::new());
    let source = write_source(harness.work_dir.path(), "src_window.mp4").await;

    let mut request = GenerateRequest::new("owner-1", &source);
    request.window_start = Some(100.0);
    request.window_end = Some(200.0);
    request.clip_length = Some(15.0);

    let id = harness.orchestrator.submit(request).await.unwrap();
    let job = wait_for_terminal(&harness.store, &id).await;

    assert_eq!(job.status, JobStatus::Completed);
    for clip in &job.clips {
        assert!(clip.source_offset_seconds >= 100.0);
        assert!(clip.source_offset_seconds + clip.length_seconds <= 200.0 + 1e-9);
        assert!((clip.length_seconds - 15.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn invalid_window_fails_via_job_state() {
    let harness = build_harness(FakeProbe { duration: Some(600.0) }, FakeRenderer::new());
    let source = write_source(harness.work_dir.path(), "src_bad_window.mp4").await;

    let mut request = GenerateRequest::new("owner-1", &source);
    request.window_start = Some(500.0);
    request.window_end = Some(100.0);

    let id = harness.orchestrator.submit(request).await.unwrap();
    let job = wait_for_terminal(&harness.store, &id).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(job.error_detail.unwrap().contains("Invalid window"));
    assert_eq!(harness.renderer.call_count(), 0);
    assert!(!source.exists());
}
