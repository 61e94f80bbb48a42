//! FFmpeg CLI wrapper for clip generation.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Timeout-bounded process execution with stderr capture
//! - Source probing via FFprobe
//! - Vertical clip rendering and thumbnail extraction

pub mod command;
pub mod error;
pub mod filters;
pub mod probe;
pub mod render;
pub mod thumbnail;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use filters::FILTER_VERTICAL_FILL;
pub use probe::{probe_duration, probe_video, VideoInfo};
pub use render::render_clip;
pub use thumbnail::generate_thumbnail;
