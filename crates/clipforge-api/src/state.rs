//! Application state.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use clipforge_engine::{
    CreditLedger, EngineConfig, FallbackAdvisor, FfmpegRenderer, FfprobeDurationProbe,
    GeminiAdvisor, JobOrchestrator, JobStore, RemoteCreditLedger, TimestampAdvisor,
    NoopCreditLedger,
};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<JobStore>,
    pub orchestrator: Arc<JobOrchestrator>,
    /// Shared directory uploads are streamed into
    pub work_dir: PathBuf,
}

impl AppState {
    /// Create new application state, wiring the engine collaborators from
    /// the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let engine_config = EngineConfig::from_env();
        let work_dir = engine_config.work_dir.clone();
        tokio::fs::create_dir_all(&work_dir)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create work dir {}: {}", work_dir.display(), e))?;

        let store = Arc::new(JobStore::new());

        let advisor: Arc<dyn TimestampAdvisor> = match GeminiAdvisor::from_env() {
            Some(gemini) => {
                info!("Timestamp advisor: Gemini");
                Arc::new(gemini)
            }
            None => {
                info!("Timestamp advisor: deterministic fallback (GEMINI_API_KEY unset)");
                Arc::new(FallbackAdvisor)
            }
        };

        let ledger: Arc<dyn CreditLedger> = match RemoteCreditLedger::from_env() {
            Some(remote) => {
                info!("Credit ledger: remote");
                Arc::new(remote)
            }
            None => {
                info!("Credit ledger: noop (CREDITS_SERVICE_URL unset)");
                Arc::new(NoopCreditLedger)
            }
        };

        let renderer = Arc::new(FfmpegRenderer::new(
            engine_config.encoding.clone(),
            engine_config.render_timeout.as_secs(),
        ));

        let orchestrator = Arc::new(JobOrchestrator::new(
            engine_config,
            Arc::clone(&store),
            Arc::new(FfprobeDurationProbe),
            advisor,
            renderer,
            ledger,
        ));

        Ok(Self {
            config,
            store,
            orchestrator,
            work_dir,
        })
    }
}
