use super::tts_repository::TtsRepository;
use crate::domain::tts::AudioFormat;
use crate::infrastructure::process::stderr_tail;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Local eSpeak implementation of TTS repository.
///
/// Text is fed through stdin so that chunks starting with `-` are never
/// parsed as command line flags.
pub struct EspeakTtsRepository {
    binary: String,
}

impl EspeakTtsRepository {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }

    async fn run_espeak(&self, text: &str, output_path: &std::path::Path) -> Result<(), String> {
        let mut child = Command::new(&self.binary)
            .arg("--stdin")
            .arg("-w")
            .arg(output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("eSpeak error: failed to start '{}': {}", self.binary, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| format!("eSpeak error: failed to write text: {}", e))?;
            // Dropping stdin closes the pipe so espeak sees EOF
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("eSpeak error: {}", e))?;

        if !output.status.success() {
            tracing::error!(
                binary = %self.binary,
                exit_status = ?output.status.code(),
                text_length = text.len(),
                "eSpeak synthesis failed"
            );
            return Err(format!("eSpeak error: {}", stderr_tail(&output.stderr)));
        }

        Ok(())
    }
}

#[async_trait]
impl TtsRepository for EspeakTtsRepository {
    fn output_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let wav_file = tempfile::Builder::new()
            .prefix("espeak-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| format!("eSpeak error: cannot create temp file: {}", e))?;

        self.run_espeak(text, wav_file.path()).await?;

        let audio_data = tokio::fs::read(wav_file.path())
            .await
            .map_err(|e| format!("eSpeak error: cannot read output: {}", e))?;

        tracing::debug!(
            provider = "espeak",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
