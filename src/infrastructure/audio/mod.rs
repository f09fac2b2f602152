pub mod ffmpeg_merger;
pub mod wav_merger;

pub use ffmpeg_merger::FfmpegMerger;
pub use wav_merger::WavMerger;

use crate::domain::tts::AudioFormat;
use crate::infrastructure::config::{Config, MergerKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("No audio chunks to merge")]
    NoChunks,
    #[error("{0}")]
    Unsupported(String),
    #[error("{0}")]
    Engine(String),
    #[error("merge I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Concatenates ordered chunk artifacts into a single audio file.
///
/// Implementations must keep the input order, must never create `output`
/// when `inputs` is empty, and transcode when `source` and `target` differ.
#[async_trait]
pub trait AudioMerger: Send + Sync {
    async fn merge(
        &self,
        inputs: &[PathBuf],
        source: AudioFormat,
        output: &Path,
        target: AudioFormat,
    ) -> Result<(), MergeError>;
}

pub fn build_audio_merger(config: &Config) -> Arc<dyn AudioMerger> {
    match config.audio_merger {
        MergerKind::Ffmpeg => Arc::new(FfmpegMerger::new(
            config.ffmpeg_binary.clone(),
            config.mp3_bitrate.clone(),
        )),
        MergerKind::Native => Arc::new(WavMerger::new()),
    }
}
