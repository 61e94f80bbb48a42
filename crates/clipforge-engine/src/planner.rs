//! Segment planning: turning a source duration and a requested window into
//! the ordered list of (start, length) cuts to render.
//!
//! Planning is a pure function of its inputs. The same inputs always yield
//! the same plan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clipforge_models::{Segment, SegmentPlan};

/// Clip length policy bounds, in seconds.
pub const MIN_CLIP_LENGTH_SECS: f64 = 15.0;
pub const MAX_CLIP_LENGTH_SECS: f64 = 59.0;

/// Planning errors. Both are fatal to the requesting job: without a valid
/// window or a source long enough for one clip there is no placement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Invalid window: start {start}s, end {end}s (source is {duration}s)")]
    InvalidRange { start: f64, end: f64, duration: f64 },

    #[error("Source too short: {duration}s cannot fit a {clip_length}s clip")]
    InsufficientDuration { duration: f64, clip_length: f64 },
}

/// How start points are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStrategy {
    /// Evenly spaced starts across the window
    Uniform,
    /// Advisor-suggested starts, padded from the uniform distribution
    #[default]
    Advised,
}

impl PlanStrategy {
    /// Parse from string (case-insensitive); unknown values fall back to
    /// the default.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "uniform" => PlanStrategy::Uniform,
            _ => PlanStrategy::Advised,
        }
    }
}

/// Clamp a requested clip length to the policy bounds.
pub fn clamp_clip_length(requested: f64) -> f64 {
    requested.clamp(MIN_CLIP_LENGTH_SECS, MAX_CLIP_LENGTH_SECS)
}

/// Compute a uniform segment plan.
///
/// Distributes `clip_count` starts evenly across
/// `[window_start, window_end - clip_length]`. When the window is no wider
/// than one clip, every start degenerates to the same clamped position and
/// the clips overlap; that is accepted behavior, not an error.
///
/// Every returned segment satisfies `0 <= start` and
/// `start + length <= duration`.
pub fn plan(
    duration: f64,
    window_start: f64,
    window_end: f64,
    clip_length: f64,
    clip_count: usize,
) -> Result<SegmentPlan, PlanError> {
    let clip_length = clamp_clip_length(clip_length);

    if window_start < 0.0 || window_end > duration || window_end <= window_start {
        return Err(PlanError::InvalidRange {
            start: window_start,
            end: window_end,
            duration,
        });
    }

    if duration < clip_length {
        return Err(PlanError::InsufficientDuration {
            duration,
            clip_length,
        });
    }

    let range = window_end - window_start;
    let latest_start = duration - clip_length;

    let starts: Vec<f64> = if range > clip_length && clip_count > 1 {
        let step = (range - clip_length) / (clip_count - 1) as f64;
        (0..clip_count)
            .map(|i| window_start + step * i as f64)
            .collect()
    } else {
        // Window narrower than one clip (or a single clip): all starts
        // collapse onto the window start, clamped below.
        vec![window_start; clip_count]
    };

    Ok(starts
        .into_iter()
        .map(|start| Segment::new(start.min(latest_start).max(0.0), clip_length))
        .collect())
}

/// Compute a plan seeded with advisor-suggested starts.
///
/// Suggestion `i` replaces the uniform start for clip `i`; missing
/// suggestions pad from the uniform distribution. Suggested starts go
/// through the same end-of-file clamp as computed ones.
pub fn plan_advised(
    duration: f64,
    window_start: f64,
    window_end: f64,
    clip_length: f64,
    clip_count: usize,
    suggestions: &[f64],
) -> Result<SegmentPlan, PlanError> {
    let clip_length = clamp_clip_length(clip_length);
    let uniform = plan(duration, window_start, window_end, clip_length, clip_count)?;
    let latest_start = duration - clip_length;

    Ok(uniform
        .into_iter()
        .enumerate()
        .map(|(i, segment)| match suggestions.get(i) {
            Some(&start) => Segment::new(start.min(latest_start).max(0.0), clip_length),
            None => segment,
        })
        .collect())
}
