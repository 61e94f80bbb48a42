//! Produced clip results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One rendered output clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipResult {
    /// Derived from job ID + sequence index, unique within the job
    pub id: String,

    /// Human label, sequence-numbered
    pub title: String,

    /// Exact cut start used, for reproducibility
    pub source_offset_seconds: f64,

    /// Exact cut length used
    pub length_seconds: f64,

    /// Locator (path/URL) of the produced media artifact
    pub output_ref: String,

    /// Locator of a preview image
    pub thumbnail_ref: String,
}

impl ClipResult {
    /// Build the clip ID for a given job and sequence index.
    pub fn make_id(job_id: &str, index: u32) -> String {
        format!("{}-{}", job_id, index)
    }

    /// Build the sequence-numbered title for a clip (1-based).
    pub fn make_title(index: u32) -> String {
        format!("Viral Cut #{}", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_id_derivation() {
        assert_eq!(ClipResult::make_id("job-abc", 0), "job-abc-0");
        assert_eq!(ClipResult::make_id("job-abc", 9), "job-abc-9");
    }

    #[test]
    fn test_clip_title_numbering() {
        assert_eq!(ClipResult::make_title(0), "Viral Cut #1");
        assert_eq!(ClipResult::make_title(9), "Viral Cut #10");
    }
}
