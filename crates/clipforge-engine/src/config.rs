//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use clipforge_models::EncodingConfig;

use crate::planner::PlanStrategy;

/// Clip-generation pipeline configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of clips produced per job
    pub clip_count: usize,
    /// Clip length used when the request carries no override, in seconds
    pub default_clip_length: f64,
    /// Wall-clock bound per render invocation
    pub render_timeout: Duration,
    /// Credits debited once per completed job
    pub credit_cost: u32,
    /// Shared directory for uploaded sources and produced clips
    pub work_dir: PathBuf,
    /// Planning strategy
    pub strategy: PlanStrategy,
    /// Encoder settings
    pub encoding: EncodingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clip_count: 10,
            default_clip_length: 50.0,
            render_timeout: Duration::from_secs(180),
            credit_cost: 10,
            work_dir: PathBuf::from("/tmp/clipforge"),
            strategy: PlanStrategy::default(),
            encoding: EncodingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            clip_count: std::env::var("CLIP_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            default_clip_length: std::env::var("CLIP_LENGTH_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50.0),
            render_timeout: Duration::from_secs(
                std::env::var("RENDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(180),
            ),
            credit_cost: std::env::var("CLIP_CREDIT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/clipforge")),
            strategy: std::env::var("PLAN_STRATEGY")
                .map(|s| PlanStrategy::parse(&s))
                .unwrap_or_default(),
            encoding: EncodingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.clip_count, 10);
        assert_eq!(config.credit_cost, 10);
        assert_eq!(config.render_timeout, Duration::from_secs(180));
        assert_eq!(config.strategy, PlanStrategy::Advised);
    }
}
