use crate::domain::tts::TtsError;
use crate::infrastructure::audio::MergeError;

/// Failure of one pipeline stage. The message becomes the job's `error`.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Tts(#[from] TtsError),
    #[error("Synthesis failed for chunk {chunk} of {total}: {source}")]
    Synthesis {
        chunk: usize,
        total: usize,
        #[source]
        source: TtsError,
    },
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Job expired before it could complete")]
    Evicted,
}
