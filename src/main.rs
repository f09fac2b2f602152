use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use narrator_backend::controllers::job::JobController;
use narrator_backend::domain::job::{JobRegistry, JobRunner, Pipeline};
use narrator_backend::domain::tts::TtsManager;
use narrator_backend::infrastructure::audio::build_audio_merger;
use narrator_backend::infrastructure::config::{Config, LogFormat};
use narrator_backend::infrastructure::http::{build_router, start_http_server};
use narrator_backend::infrastructure::storage::Storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Narrator Backend on {}:{}",
        config.host,
        config.port
    );

    // Prepare scratch and results areas
    let storage = Storage::new(config.temp_dir.clone(), config.result_dir.clone());
    storage.bootstrap().await?;
    tracing::info!(
        temp_dir = %storage.temp_dir().display(),
        result_dir = %storage.result_dir().display(),
        "Storage areas ready"
    );

    // Select the synthesis backend
    let mut tts = TtsManager::new();
    tts.select(config.tts_backend, &config).await?;
    let tts = Arc::new(tts);

    let merger = build_audio_merger(&config);

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let registry = Arc::new(JobRegistry::new(storage.clone()));
    let _sweeper = registry
        .clone()
        .start_sweeper(config.sweep_interval, config.job_retention);
    tracing::info!(
        interval_secs = config.sweep_interval.as_secs(),
        retention_secs = config.job_retention.as_secs(),
        "Job sweeper started"
    );

    let pipeline = Arc::new(Pipeline::new(
        tts.clone(),
        merger,
        config.output_format,
        config.max_chunk_chars,
    ));
    let runner = Arc::new(JobRunner::new(
        registry.clone(),
        pipeline,
        storage,
        config.job_id_policy,
    ));
    let job_controller = Arc::new(JobController::new(
        runner,
        registry.clone(),
        config.output_format,
    ));

    // Start HTTP server with all routes
    let app = build_router(job_controller, tts, registry);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrator_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrator_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
