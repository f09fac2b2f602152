use super::{AudioMerger, MergeError};
use crate::domain::tts::AudioFormat;
use async_trait::async_trait;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// In-process WAV concatenation. Needs no external engine but cannot
/// transcode, so it only handles wav chunks into a wav result.
#[derive(Default)]
pub struct WavMerger;

impl WavMerger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioMerger for WavMerger {
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
        if source != AudioFormat::Wav || target != AudioFormat::Wav {
            return Err(MergeError::Unsupported(format!(
                "native merger only supports wav to wav, got {} to {}",
                source, target
            )));
        }

        let inputs = inputs.to_vec();
        let output = output.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let result = concat_wav(&inputs, &output);
            if result.is_err() && output.exists() {
                let _ = std::fs::remove_file(&output);
            }
            result
        })
        .await
        .map_err(|e| MergeError::Engine(format!("WAV merge task failed: {}", e)))?
    }
}

fn concat_wav(inputs: &[PathBuf], output: &Path) -> Result<(), MergeError> {
    let spec = open_reader(&inputs[0])?.spec();
    let mut writer = WavWriter::create(output, spec)
        .map_err(|e| MergeError::Engine(format!("WAV error: cannot create {}: {}", output.display(), e)))?;

    for path in inputs {
        let mut reader = open_reader(path)?;
        ensure_same_spec(path, reader.spec(), spec)?;

        match spec.sample_format {
            SampleFormat::Int => {
                for sample in reader.samples::<i32>() {
                    writer.write_sample(sample.map_err(|e| wav_error(path, e))?).map_err(|e| wav_error(output, e))?;
                }
            }
            SampleFormat::Float => {
                for sample in reader.samples::<f32>() {
                    writer.write_sample(sample.map_err(|e| wav_error(path, e))?).map_err(|e| wav_error(output, e))?;
                }
            }
        }
    }

    writer.finalize().map_err(|e| wav_error(output, e))
}

fn open_reader(path: &Path) -> Result<WavReader<std::io::BufReader<std::fs::File>>, MergeError> {
    WavReader::open(path).map_err(|e| wav_error(path, e))
}

fn ensure_same_spec(path: &Path, actual: WavSpec, expected: WavSpec) -> Result<(), MergeError> {
    if actual != expected {
        return Err(MergeError::Engine(format!(
            "WAV error: {} has {} ch / {} Hz / {} bit, expected {} ch / {} Hz / {} bit",
            path.display(),
            actual.channels,
            actual.sample_rate,
            actual.bits_per_sample,
            expected.channels,
            expected.sample_rate,
            expected.bits_per_sample
        )));
    }
    Ok(())
}

fn wav_error(path: &Path, err: hound::Error) -> MergeError {
    MergeError::Engine(format!("WAV error: {}: {}", path.display(), err))
}
