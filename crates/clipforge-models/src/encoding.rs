//! Encoding configuration for clip rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Target vertical geometry (9:16 portrait).
pub const TARGET_WIDTH: u32 = 1080;
pub const TARGET_HEIGHT: u32 = 1920;

/// Thumbnail extraction parameters.
pub const THUMBNAIL_SCALE_WIDTH: u32 = 480;
pub const THUMBNAIL_TIMESTAMP: &str = "00:00:01";

/// Encoder settings for produced clips.
///
/// Defaults favor speed over size: short-form clips are throwaway assets
/// with an external expiry, so fast turnaround wins.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    /// Video codec
    pub codec: String,
    /// Encoder speed/quality preset
    pub preset: String,
    /// Constant rate factor (quality)
    pub crf: u8,
    /// Audio codec
    pub audio_codec: String,
    /// Audio bitrate
    pub audio_bitrate: String,
    /// Audio channel count
    pub audio_channels: u8,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            preset: "ultrafast".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            audio_channels: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoding() {
        let enc = EncodingConfig::default();
        assert_eq!(enc.codec, "libx264");
        assert_eq!(enc.preset, "ultrafast");
        assert_eq!(enc.crf, 23);
        assert_eq!(enc.audio_channels, 2);
    }
}
