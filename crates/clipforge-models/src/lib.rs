//! Shared data models for the ClipForge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and their lifecycle states
//! - Produced clip results
//! - Segment plans (cut points computed before rendering)
//! - Encoding configuration

pub mod clip;
pub mod encoding;
pub mod job;
pub mod segment;

// Re-export common types
pub use clip::ClipResult;
pub use encoding::EncodingConfig;
pub use job::{Job, JobId, JobStatus};
pub use segment::{Segment, SegmentPlan};
