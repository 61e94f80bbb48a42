//! Job polling handlers.
//!
//! Pollers distinguish "not found" (404), "still running" (200 with a
//! non-terminal status), and "failed with reason X" (200 with status
//! `error` and `error_detail`).

use axum::extract::{Path, State};
use axum::Json;

use clipforge_models::{Job, JobId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/jobs/:job_id
///
/// Returns the full job record: status, progress, clip counters, produced
/// clips, and failure detail when the job errored.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    if !is_valid_job_id(&job_id) {
        return Err(ApiError::bad_request("Invalid job ID format"));
    }

    let job = state.store.get(&JobId::from_string(job_id)).await?;
    Ok(Json(job))
}

/// Validate job ID format to prevent injection attacks.
///
/// Valid format: alphanumeric characters and hyphens only, 8-64 chars.
fn is_valid_job_id(id: &str) -> bool {
    if id.len() < 8 || id.len() > 64 {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
