//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::clips::submit_clip_job;
use crate::handlers::health;
use crate::handlers::jobs::get_job;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Multipart framing overhead allowed on top of the raw upload ceiling.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size + MULTIPART_OVERHEAD;

    let api_routes = Router::new()
        .route("/clips", post(submit_clip_job))
        .route("/jobs/:job_id", get(get_job));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        // Request body size limit; the per-file ceiling is enforced again
        // while streaming the upload to disk
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
