//! Job submission: multipart upload intake.
//!
//! Accepts the video payload plus optional window overrides, validates
//! what is checkable before any background work starts, creates the job
//! record, and returns the job ID immediately. Rendering runs detached.

use std::path::PathBuf;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use clipforge_engine::GenerateRequest;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Submission response.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
}

#[derive(Default)]
struct UploadParams {
    owner_id: Option<String>,
    window_start: Option<f64>,
    window_end: Option<f64>,
    clip_length: Option<f64>,
}

/// POST /api/clips
///
/// Multipart fields:
/// - `video` (required): the source video payload
/// - `owner_id` (required): opaque owning-user identifier
/// - `window_start`, `window_end`, `clip_length` (optional): seconds
///
/// Returns `{ "job_id": ... }` immediately. Validation failures are
/// rejected synchronously with no job created; anything only detectable
/// after probing surfaces through the job's `error` state instead.
pub async fn submit_clip_job(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<SubmitResponse>> {
    let mut source_path: Option<PathBuf> = None;

    match ingest(&state, multipart, &mut source_path).await {
        Ok(response) => Ok(response),
        Err(e) => {
            // The upload never became a job; drop the partial file.
            if let Some(path) = source_path {
                if let Err(rm_err) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to remove rejected upload {}: {}", path.display(), rm_err);
                }
            }
            Err(e)
        }
    }
}

async fn ingest(
    state: &AppState,
    mut multipart: Multipart,
    source_path: &mut Option<PathBuf>,
) -> ApiResult<Json<SubmitResponse>> {
    let mut params = UploadParams::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => {
                let path = state.work_dir.join(format!("src_{}.mp4", Uuid::new_v4()));
                let mut file = tokio::fs::File::create(&path).await?;
                *source_path = Some(path);

                let mut written: usize = 0;
                while let Some(chunk) = field.chunk().await? {
                    written += chunk.len();
                    if written > state.config.max_upload_size {
                        return Err(ApiError::PayloadTooLarge(state.config.max_upload_size));
                    }
                    file.write_all(&chunk).await?;
                }
                file.flush().await?;

                if written == 0 {
                    return Err(ApiError::bad_request("Attached video file is empty"));
                }
            }
            "owner_id" => params.owner_id = Some(field.text().await?),
            "window_start" => {
                params.window_start = Some(parse_seconds("window_start", &field.text().await?)?)
            }
            "window_end" => {
                params.window_end = Some(parse_seconds("window_end", &field.text().await?)?)
            }
            "clip_length" => {
                params.clip_length = Some(parse_seconds("clip_length", &field.text().await?)?)
            }
            other => warn!("Ignoring unknown multipart field: {}", other),
        }
    }

    let source = source_path
        .clone()
        .ok_or_else(|| ApiError::bad_request("No video file attached"))?;

    let owner_id = params
        .owner_id
        .ok_or_else(|| ApiError::bad_request("Missing owner_id"))?;

    // Window sanity that needs no probe. The upper bound against the
    // source duration is only known after probing and is checked there.
    if let (Some(start), Some(end)) = (params.window_start, params.window_end) {
        if end <= start {
            return Err(ApiError::bad_request(
                "window_end must be greater than window_start",
            ));
        }
    }

    let mut request = GenerateRequest::new(owner_id, source);
    request.window_start = params.window_start;
    request.window_end = params.window_end;
    request.clip_length = params.clip_length;

    let job_id = state.orchestrator.submit(request).await?;

    info!(job_id = %job_id, "Upload accepted");
    Ok(Json(SubmitResponse {
        job_id: job_id.to_string(),
    }))
}

/// Parse a seconds field: finite, non-negative.
fn parse_seconds(name: &str, value: &str) -> ApiResult<f64> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("{} must be a number of seconds", name)))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ApiError::bad_request(format!(
            "{} must be a non-negative number of seconds",
            name
        )));
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_valid() {
        assert!((parse_seconds("window_start", "120").unwrap() - 120.0).abs() < 1e-9);
        assert!((parse_seconds("window_start", " 1.5 ").unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_seconds_rejects_junk() {
        assert!(parse_seconds("window_start", "abc").is_err());
        assert!(parse_seconds("window_start", "-3").is_err());
        assert!(parse_seconds("window_start", "NaN").is_err());
        assert!(parse_seconds("window_start", "inf").is_err());
    }
}
