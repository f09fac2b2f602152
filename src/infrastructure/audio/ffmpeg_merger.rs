use super::{AudioMerger, MergeError};
use crate::domain::tts::AudioFormat;
use crate::infrastructure::process::stderr_tail;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const CONCAT_LIST_FILE: &str = "concat_list.txt";

/// Merges chunks with the ffmpeg concat demuxer.
///
/// The list file is written next to the chunks (the job's scratch area), so
/// concurrent jobs never share it.
pub struct FfmpegMerger {
    binary: String,
    mp3_bitrate: String,
}

impl FfmpegMerger {
    pub fn new(binary: String, mp3_bitrate: String) -> Self {
        Self {
            binary,
            mp3_bitrate,
        }
    }

    fn codec_args(&self, source: AudioFormat, target: AudioFormat) -> Vec<String> {
        let args: Vec<&str> = if source == target {
            vec!["-c", "copy"]
        } else {
            match target {
                AudioFormat::Mp3 => vec!["-c:a", "libmp3lame", "-b:a", self.mp3_bitrate.as_str()],
                AudioFormat::Wav => vec!["-c:a", "pcm_s16le"],
            }
        };
        args.into_iter().map(String::from).collect()
    }

    async fn write_concat_list(&self, inputs: &[PathBuf]) -> Result<PathBuf, MergeError> {
        let list_dir = inputs[0]
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let list_path = list_dir.join(CONCAT_LIST_FILE);

        let mut contents = String::new();
        for input in inputs {
            // Entries are resolved relative to the list file, so always write absolute paths
            let absolute = tokio::fs::canonicalize(input).await?;
            contents.push_str(&format!("file '{}'\n", escape_concat_path(&absolute)));
        }

        tokio::fs::write(&list_path, contents).await?;
        Ok(list_path)
    }

    async fn run_ffmpeg(
        &self,
        list_path: &Path,
        source: AudioFormat,
        output: &Path,
        target: AudioFormat,
    ) -> Result<(), MergeError> {
        let result = Command::new(&self.binary)
            .args(["-y", "-hide_banner", "-loglevel", "error"])
            .args(["-f", "concat", "-safe", "0", "-i"])
            .arg(list_path)
            .args(self.codec_args(source, target))
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MergeError::Engine(format!("FFmpeg error: failed to start '{}': {}", self.binary, e)))?;

        if !result.status.success() {
            tracing::error!(
                binary = %self.binary,
                exit_status = ?result.status.code(),
                source_format = %source,
                target_format = %target,
                "FFmpeg merge failed"
            );
            return Err(MergeError::Engine(format!("FFmpeg error: {}", stderr_tail(&result.stderr))));
        }

        Ok(())
    }
}

#[async_trait]
impl AudioMerger for FfmpegMerger {
    async fn merge(
        &self,
        inputs: &[PathBuf],
        source: AudioFormat,
        output: &Path,
        target: AudioFormat,
    ) -> Result<(), MergeError> {
        if inputs.is_empty() {
            return Err(MergeError::NoChunks);
        }

        let list_path = self.write_concat_list(inputs).await?;
        let result = self.run_ffmpeg(&list_path, source, output, target).await;

        if let Err(e) = tokio::fs::remove_file(&list_path).await {
            tracing::warn!(path = %list_path.display(), error = %e, "Failed to remove ffmpeg list file");
        }

        if result.is_err() && tokio::fs::try_exists(output).await.unwrap_or(false) {
            let _ = tokio::fs::remove_file(output).await;
        }

        result
    }
}

/// Quote a path for the concat demuxer: `'` becomes `'\''`
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}
