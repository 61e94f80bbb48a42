//! Duration probe seam over the external media-inspection tool.

use std::path::Path;

use async_trait::async_trait;

use clipforge_media::MediaResult;

/// Source duration lookup. One invocation either succeeds or fails; there
/// are no internal retries.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Total duration of the source in seconds, guaranteed > 0 on success.
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64>;
}

/// FFprobe-backed implementation.
pub struct FfprobeDurationProbe;

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64> {
        clipforge_media::probe_duration(path).await
    }
}
