pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, job::JobController};
use crate::domain::{job::JobRegistry, tts::TtsManager};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Assemble every route with the shared middleware stack
pub fn build_router(
    job_controller: Arc<JobController>,
    tts: Arc<TtsManager>,
    registry: Arc<JobRegistry>,
) -> Router {
    let job_routes = Router::new()
        .route("/generate", post(JobController::generate))
        .route("/status/:job_id", get(JobController::status))
        .route("/result/:job_id", get(JobController::result))
        .with_state(job_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state((tts, registry))
        .merge(job_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process stops
pub async fn start_http_server(config: Arc<Config>, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
