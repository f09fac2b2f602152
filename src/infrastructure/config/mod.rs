use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::job::JobIdPolicy;
use crate::domain::tts::{AudioFormat, TtsBackend};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Output
    pub output_format: AudioFormat,
    pub mp3_bitrate: String,
    // Pipeline
    pub tts_backend: TtsBackend,
    pub audio_merger: MergerKind,
    pub max_chunk_chars: usize,
    pub job_id_policy: JobIdPolicy,
    // Retention
    pub job_retention: Duration,
    pub sweep_interval: Duration,
    // Storage
    pub temp_dir: PathBuf,
    pub result_dir: PathBuf,
    // Engines
    pub espeak_binary: String,
    pub ffmpeg_binary: String,
    pub aws_region: String,
    pub polly_voice: String,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub openai_tts_voice: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Engine used to concatenate chunk artifacts
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergerKind {
    Ffmpeg,
    Native,
}

impl FromStr for MergerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ffmpeg" => Ok(MergerKind::Ffmpeg),
            "native" => Ok(MergerKind::Native),
            other => Err(format!("invalid audio merger '{}'", other)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            output_format: AudioFormat::Mp3,
            mp3_bitrate: "192k".to_string(),
            tts_backend: TtsBackend::Espeak,
            audio_merger: MergerKind::Ffmpeg,
            max_chunk_chars: 500,
            job_id_policy: JobIdPolicy::Random,
            job_retention: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
            temp_dir: PathBuf::from("temp"),
            result_dir: PathBuf::from("results"),
            espeak_binary: "espeak".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
            aws_region: "eu-west-1".to_string(),
            polly_voice: "Joanna".to_string(),
            openai_api_key: None,
            openai_tts_model: "tts-1".to_string(),
            openai_tts_voice: "alloy".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup, falling back to
    /// the defaults for every missing key
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = Config {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", var("PORT"), defaults.port)?,
            environment: var("ENVIRONMENT")
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })
                .unwrap_or(defaults.environment),
            log_format: var("LOG_FORMAT")
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(defaults.log_format),
            output_format: parse_or("OUTPUT_FORMAT", var("OUTPUT_FORMAT"), defaults.output_format)?,
            mp3_bitrate: var("MP3_BITRATE").unwrap_or(defaults.mp3_bitrate),
            tts_backend: parse_or("TTS_BACKEND", var("TTS_BACKEND"), defaults.tts_backend)?,
            audio_merger: parse_or("AUDIO_MERGER", var("AUDIO_MERGER"), defaults.audio_merger)?,
            max_chunk_chars: parse_or("MAX_CHUNK_CHARS", var("MAX_CHUNK_CHARS"), defaults.max_chunk_chars)?,
            job_id_policy: parse_or("JOB_ID_POLICY", var("JOB_ID_POLICY"), defaults.job_id_policy)?,
            job_retention: parse_or("JOB_RETENTION_SECS", var("JOB_RETENTION_SECS"), defaults.job_retention.as_secs())
                .map(Duration::from_secs)?,
            sweep_interval: parse_or("SWEEP_INTERVAL_SECS", var("SWEEP_INTERVAL_SECS"), defaults.sweep_interval.as_secs())
                .map(Duration::from_secs)?,
            temp_dir: var("TEMP_DIR").map(PathBuf::from).unwrap_or(defaults.temp_dir),
            result_dir: var("RESULT_DIR").map(PathBuf::from).unwrap_or(defaults.result_dir),
            espeak_binary: var("ESPEAK_BINARY").unwrap_or(defaults.espeak_binary),
            ffmpeg_binary: var("FFMPEG_BINARY").unwrap_or(defaults.ffmpeg_binary),
            aws_region: var("AWS_REGION").unwrap_or(defaults.aws_region),
            polly_voice: var("POLLY_VOICE").unwrap_or(defaults.polly_voice),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_tts_model: var("OPENAI_TTS_MODEL").unwrap_or(defaults.openai_tts_model),
            openai_tts_voice: var("OPENAI_TTS_VOICE").unwrap_or(defaults.openai_tts_voice),
        };

        if config.max_chunk_chars == 0 {
            anyhow::bail!("MAX_CHUNK_CHARS must be greater than zero");
        }
        if config.sweep_interval.is_zero() {
            anyhow::bail!("SWEEP_INTERVAL_SECS must be greater than zero");
        }
        // The native merger concatenates wav chunks into a wav result, nothing else
        if config.audio_merger == MergerKind::Native
            && (config.output_format != AudioFormat::Wav || config.tts_backend != TtsBackend::Espeak)
        {
            anyhow::bail!(
                "AUDIO_MERGER=native requires OUTPUT_FORMAT=wav and TTS_BACKEND=espeak (got {} output from {})",
                config.output_format,
                config.tts_backend
            );
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid value for {}: '{}'", key, value)),
        None => Ok(default),
    }
}
