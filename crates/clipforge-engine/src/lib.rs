//! Asynchronous clip-generation job pipeline.
//!
//! This crate owns everything between "a source file landed on disk" and
//! "a pack of vertical clips exists":
//! - Segment planning (uniform or advisor-assisted cut points)
//! - The per-job state machine and its background task
//! - The in-memory job store polled by the HTTP boundary
//! - The credit-ledger and timestamp-suggestion collaborator seams

pub mod advisor;
pub mod config;
pub mod credits;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod probe;
pub mod render;
pub mod store;

pub use advisor::{fallback_offsets, FallbackAdvisor, GeminiAdvisor, TimestampAdvisor};
pub use config::EngineConfig;
pub use credits::{CreditError, CreditLedger, NoopCreditLedger, RemoteCreditLedger};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{GenerateRequest, JobOrchestrator};
pub use planner::{PlanError, PlanStrategy, MAX_CLIP_LENGTH_SECS, MIN_CLIP_LENGTH_SECS};
pub use probe::{DurationProbe, FfprobeDurationProbe};
pub use render::{ClipRenderer, FfmpegRenderer, RenderedClip};
pub use store::{JobStore, JobUpdate, StoreError};
