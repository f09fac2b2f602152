use crate::domain::tts::AudioFormat;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS engine (eSpeak, AWS Polly, OpenAI, etc.)
///
/// Implementations synthesize one chunk at a time; splitting long text
/// and merging the resulting audio is the job pipeline's responsibility.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Native container format of the bytes returned by [`Self::synthesize`]
    fn output_format(&self) -> AudioFormat;

    /// Synthesize a single chunk of text to speech
    ///
    /// # Errors
    /// Returns a human-readable cause if the engine is unavailable or fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String>;
}
