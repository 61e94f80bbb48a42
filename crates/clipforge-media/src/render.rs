//! Vertical clip rendering.

use std::path::Path;
use tracing::info;

use clipforge_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::FILTER_VERTICAL_FILL;

/// Render one vertical clip from a source video.
///
/// Seeks to `start_seconds` before opening the input, reads
/// `length_seconds`, scales to fill the 9:16 frame and center-crops.
/// Bounded by `timeout_secs` of wall-clock time; a timeout is treated the
/// same as a process failure.
///
/// Post-condition: the output file exists and is non-empty, otherwise the
/// render is reported as failed even when FFmpeg exited cleanly.
pub async fn render_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_seconds: f64,
    length_seconds: f64,
    encoding: &EncodingConfig,
    timeout_secs: u64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Rendering clip: {} -> {} (start: {:.2}s, length: {:.2}s)",
        input.display(),
        output.display(),
        start_seconds,
        length_seconds
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_seconds)
        .duration(length_seconds)
        .video_filter(FILTER_VERTICAL_FILL)
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_channels(encoding.audio_channels)
        .audio_bitrate(&encoding.audio_bitrate);

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await?;

    verify_output(output).await
}

/// Verify a rendered output exists and is non-empty.
async fn verify_output(path: &Path) -> MediaResult<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        Ok(_) | Err(_) => Err(MediaError::EmptyOutput(path.to_path_buf())),
    }
}
