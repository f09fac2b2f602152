use super::backend::TtsBackend;

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("No TTS generator selected")]
    NotSelected,
    #[error("TTS backend '{0}' is not implemented")]
    Unsupported(TtsBackend),
    #[error("TTS backend misconfigured: {0}")]
    Misconfigured(String),
    #[error("{0}")]
    Engine(String),
}
