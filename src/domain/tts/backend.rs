use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Synthesis backends that can be named in configuration.
///
/// Not every option has an implementation; selecting one that does not
/// fails with [`super::TtsError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsBackend {
    Espeak,
    Polly,
    #[serde(rename = "openai")]
    OpenAi,
    Google,
    Coqui,
}

impl TtsBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsBackend::Espeak => "espeak",
            TtsBackend::Polly => "polly",
            TtsBackend::OpenAi => "openai",
            TtsBackend::Google => "google",
            TtsBackend::Coqui => "coqui",
        }
    }
}

impl std::fmt::Display for TtsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TtsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "espeak" => Ok(TtsBackend::Espeak),
            "polly" => Ok(TtsBackend::Polly),
            "openai" => Ok(TtsBackend::OpenAi),
            "google" => Ok(TtsBackend::Google),
            "coqui" => Ok(TtsBackend::Coqui),
            other => Err(format!("invalid TTS backend '{}'", other)),
        }
    }
}
