use super::{AudioFormat, TtsBackend, TtsError};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{build_tts_repository, TtsRepository};
use std::sync::Arc;

/// Holds the single active synthesis backend.
///
/// Every capability call fails with [`TtsError::NotSelected`] until a backend
/// has been selected.
#[derive(Default)]
pub struct TtsManager {
    selected: Option<(TtsBackend, Arc<dyn TtsRepository>)>,
}

impl TtsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select and build the backend named in configuration
    pub async fn select(&mut self, backend: TtsBackend, config: &Config) -> Result<(), TtsError> {
        let generator = build_tts_repository(backend, config).await?;
        self.install(backend, generator);
        Ok(())
    }

    /// Install an already constructed generator under the given backend name
    pub fn install(&mut self, backend: TtsBackend, generator: Arc<dyn TtsRepository>) {
        tracing::info!(
            backend = %backend,
            output_format = %generator.output_format(),
            "Selected TTS backend"
        );
        self.selected = Some((backend, generator));
    }

    pub fn selected(&self) -> Option<TtsBackend> {
        self.selected.as_ref().map(|(backend, _)| *backend)
    }

    pub fn generator(&self) -> Result<Arc<dyn TtsRepository>, TtsError> {
        self.selected
            .as_ref()
            .map(|(_, generator)| generator.clone())
            .ok_or(TtsError::NotSelected)
    }

    pub fn output_format(&self) -> Result<AudioFormat, TtsError> {
        Ok(self.generator()?.output_format())
    }

    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.generator()?
            .synthesize(text)
            .await
            .map_err(TtsError::Engine)
    }
}
