//! Job definitions for the clip-generation pipeline.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::clip::ClipResult;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle state of a generation job.
///
/// Transitions: `Analyzing -> Processing -> Completed`, with `Analyzing ->
/// Error` and `Processing -> Error` as failure edges. `Completed` and
/// `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Probing the source and computing cut points
    #[default]
    Analyzing,
    /// Rendering clips segment by segment
    Processing,
    /// All clips rendered successfully
    Completed,
    /// Job failed; `error_detail` carries the reason
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Analyzing => "analyzing",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One end-to-end request to turn a source video into a pack of short clips.
///
/// Created by the upload boundary; mutated only by the orchestrator that
/// owns the job; read by polling clients.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID, never reused
    pub id: JobId,

    /// Owning user (opaque foreign key)
    pub owner_id: String,

    /// Current lifecycle state
    #[serde(default)]
    pub status: JobStatus,

    /// Progress percentage (0-100), non-decreasing while processing
    #[serde(default)]
    pub progress: u8,

    /// Index of the clip currently being produced (1-based once processing)
    #[serde(default)]
    pub current_clip_index: u32,

    /// Total number of clips planned for this job
    #[serde(default)]
    pub total_clips: u32,

    /// Produced clips, append-only during processing
    #[serde(default)]
    pub clips: Vec<ClipResult>,

    /// Failure reason (present only when status is `error`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    /// Creation timestamp (immutable)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job in the `analyzing` state.
    pub fn new(owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            owner_id: owner_id.into(),
            status: JobStatus::Analyzing,
            progress: 0,
            current_clip_index: 0,
            total_clips: 0,
            clips: Vec::new(),
            error_detail: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_creation() {
        let job = Job::new("user123");

        assert_eq!(job.status, JobStatus::Analyzing);
        assert_eq!(job.progress, 0);
        assert!(job.clips.is_empty());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!JobStatus::Analyzing.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Analyzing).unwrap(),
            "\"analyzing\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn test_job_ids_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }
}
