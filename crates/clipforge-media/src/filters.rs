//! FFmpeg video filter definitions.

/// Vertical fill filter: scale so the short edge fills the 9:16 frame,
/// then center-crop. Avoids both letterboxing and distortion.
pub const FILTER_VERTICAL_FILL: &str =
    "scale=w=1080:h=1920:force_original_aspect_ratio=increase,crop=1080:1920,setsar=1";

/// Build the vertical fill filter for an arbitrary target geometry.
pub fn vertical_fill_filter(width: u32, height: u32) -> String {
    format!(
        "scale=w={w}:h={h}:force_original_aspect_ratio=increase,crop={w}:{h},setsar=1",
        w = width,
        h = height
    )
}

/// Build the thumbnail scaling filter.
pub fn thumbnail_filter(width: u32) -> String {
    format!("scale={}:-2", width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_models::encoding::{TARGET_HEIGHT, TARGET_WIDTH};

    #[test]
    fn test_vertical_fill_matches_target_geometry() {
        assert_eq!(
            vertical_fill_filter(TARGET_WIDTH, TARGET_HEIGHT),
            FILTER_VERTICAL_FILL
        );
    }

    #[test]
    fn test_thumbnail_filter() {
        assert_eq!(thumbnail_filter(480), "scale=480:-2");
    }
}
