//! Segment plans: the cut points computed before rendering begins.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One (start, length) cut from the source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start offset into the source, in seconds
    pub start_seconds: f64,

    /// Cut length, in seconds
    pub length_seconds: f64,
}

impl Segment {
    pub fn new(start_seconds: f64, length_seconds: f64) -> Self {
        Self {
            start_seconds,
            length_seconds,
        }
    }

    /// End offset of the segment within the source.
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.length_seconds
    }
}

/// Ordered list of segments to cut. Ephemeral: computed per job, never
/// persisted.
pub type SegmentPlan = Vec<Segment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_end() {
        let seg = Segment::new(65.0, 15.0);
        assert!((seg.end_seconds() - 80.0).abs() < f64::EPSILON);
    }
}
