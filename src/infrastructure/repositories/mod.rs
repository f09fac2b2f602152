pub mod espeak_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod tts_repository;

pub use espeak_tts_repository::EspeakTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;

use crate::domain::tts::{TtsBackend, TtsError};
use crate::infrastructure::config::Config;
use async_openai::config::OpenAIConfig;
use std::sync::Arc;

/// Build the repository implementing the requested backend.
///
/// Backends that are declared but have no implementation fail with
/// [`TtsError::Unsupported`] before any client is created.
pub async fn build_tts_repository(
    backend: TtsBackend,
    config: &Config,
) -> Result<Arc<dyn TtsRepository>, TtsError> {
    match backend {
        TtsBackend::Espeak => Ok(Arc::new(EspeakTtsRepository::new(
            config.espeak_binary.clone(),
        ))),
        TtsBackend::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = aws_sdk_polly::Client::new(&aws_config);

            Ok(Arc::new(PollyTtsRepository::new(
                Arc::new(polly_client),
                config.polly_voice.clone(),
            )))
        }
        TtsBackend::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                TtsError::Misconfigured("OPENAI_API_KEY is required for the openai backend".to_string())
            })?;
            let client = async_openai::Client::with_config(OpenAIConfig::new().with_api_key(api_key));

            Ok(Arc::new(OpenAiTtsRepository::new(
                Arc::new(client),
                config.openai_tts_model.clone(),
                config.openai_tts_voice.clone(),
            )))
        }
        TtsBackend::Google | TtsBackend::Coqui => Err(TtsError::Unsupported(backend)),
    }
}
