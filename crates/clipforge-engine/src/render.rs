//! Clip renderer seam over the external transcode tool.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

use clipforge_media::{generate_thumbnail, render_clip, MediaResult};
use clipforge_models::{EncodingConfig, Segment};

/// A successfully produced clip artifact.
#[derive(Debug, Clone)]
pub struct RenderedClip {
    /// Locator of the produced media file
    pub output_ref: String,
    /// Locator of the preview image
    pub thumbnail_ref: String,
}

/// Renders one planned segment to one output file.
///
/// No internal retry: a failed render fails the whole job under the
/// abort-on-first-failure policy.
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    async fn render(
        &self,
        source: &Path,
        segment: Segment,
        output: &Path,
    ) -> MediaResult<RenderedClip>;
}

/// FFmpeg-backed renderer producing a vertical clip and a best-effort
/// thumbnail.
pub struct FfmpegRenderer {
    encoding: EncodingConfig,
    timeout_secs: u64,
}

impl FfmpegRenderer {
    pub fn new(encoding: EncodingConfig, timeout_secs: u64) -> Self {
        Self {
            encoding,
            timeout_secs,
        }
    }
}

#[async_trait]
impl ClipRenderer for FfmpegRenderer {
    async fn render(
        &self,
        source: &Path,
        segment: Segment,
        output: &Path,
    ) -> MediaResult<RenderedClip> {
        render_clip(
            source,
            output,
            segment.start_seconds,
            segment.length_seconds,
            &self.encoding,
            self.timeout_secs,
        )
        .await?;

        // Thumbnail failures are cosmetic: keep the clip, fall back to a
        // placeholder locator.
        let thumb_path = output.with_extension("jpg");
        let thumbnail_ref = match generate_thumbnail(output, &thumb_path).await {
            Ok(()) => thumb_path.to_string_lossy().to_string(),
            Err(e) => {
                warn!("Failed to generate thumbnail for {}: {}", output.display(), e);
                placeholder_thumbnail(output)
            }
        };

        Ok(RenderedClip {
            output_ref: output.to_string_lossy().to_string(),
            thumbnail_ref,
        })
    }
}

/// Placeholder preview image seeded by the output name.
fn placeholder_thumbnail(output: &Path) -> String {
    let seed = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "clip".to_string());
    format!("https://picsum.photos/seed/{}/400/700", seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_thumbnail_seeded_by_stem() {
        let path = std::path::PathBuf::from("/tmp/work/job-1_3.mp4");
        assert_eq!(
            placeholder_thumbnail(&path),
            "https://picsum.photos/seed/job-1_3/400/700"
        );
    }
}
