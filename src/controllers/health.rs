use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::{job::JobRegistry, tts::TtsManager};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(
    State((tts, registry)): State<(Arc<TtsManager>, Arc<JobRegistry>)>,
) -> impl IntoResponse {
    let active_jobs = registry.active_count();

    match tts.selected() {
        Some(backend) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "tts_backend": backend.as_str(),
                "active_jobs": active_jobs
            })),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "tts_backend": null,
                "active_jobs": active_jobs
            })),
        ),
    }
}
