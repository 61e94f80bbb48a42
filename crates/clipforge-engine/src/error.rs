//! Engine error types.

use thiserror::Error;

use clipforge_media::MediaError;

use crate::planner::PlanError;
use crate::store::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Probe failed: {0}")]
    Probe(#[source] MediaError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Render failed on clip {index}: {source}")]
    Render {
        index: u32,
        #[source]
        source: MediaError,
    },

    #[error("Job store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Build the user-visible failure detail recorded on the job.
    ///
    /// Appends the external tool's diagnostic output when one was captured,
    /// truncated to keep the record pollable.
    pub fn detail(&self) -> String {
        let diagnostic = match self {
            EngineError::Probe(media) | EngineError::Render { source: media, .. } => {
                media.diagnostic()
            }
            _ => None,
        };

        match diagnostic {
            Some(stderr) if !stderr.trim().is_empty() => {
                format!("{}: {}", self, truncate(stderr.trim(), 500))
            }
            _ => self.to_string(),
        }
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
