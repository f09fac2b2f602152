use super::error::JobError;
use super::model::Job;
use super::segmenter::segment;
use crate::domain::tts::{AudioFormat, TtsManager};
use crate::infrastructure::audio::AudioMerger;
use crate::infrastructure::storage::remove_path;
use std::path::PathBuf;
use std::sync::Arc;

/// Progress once the text has been segmented
pub const SEGMENTED_PROGRESS: u8 = 10;
/// Progress once every chunk has been synthesized
pub const SYNTHESIZED_PROGRESS: u8 = 80;
/// Progress once the chunks have been merged
pub const MERGED_PROGRESS: u8 = 95;

/// Progress after chunk `index` (0-based) of `total`, linear between the
/// segmentation and synthesis ceilings and exactly the latter on the last chunk
pub fn chunk_progress(index: usize, total: usize) -> u8 {
    let band = (SYNTHESIZED_PROGRESS - SEGMENTED_PROGRESS) as usize;
    SEGMENTED_PROGRESS + (band * (index + 1) / total.max(1)) as u8
}

/// Drives one job through segment → synthesize → merge
pub struct Pipeline {
    tts: Arc<TtsManager>,
    merger: Arc<dyn AudioMerger>,
    output_format: AudioFormat,
    max_chunk_chars: usize,
}

impl Pipeline {
    pub fn new(
        tts: Arc<TtsManager>,
        merger: Arc<dyn AudioMerger>,
        output_format: AudioFormat,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            tts,
            merger,
            output_format,
            max_chunk_chars,
        }
    }

    pub fn output_format(&self) -> AudioFormat {
        self.output_format
    }

    /// Run the job to a terminal state. Never called twice for the same job.
    pub async fn run(&self, job: Arc<Job>) {
        let start_time = std::time::Instant::now();
        tracing::info!(
            job_id = %job.id(),
            text_length = job.source_text().len(),
            "Job pipeline started"
        );

        let outcome = self.execute(&job).await;

        // Scratch must be gone before the terminal transition is visible
        self.remove_scratch(&job).await;

        match outcome {
            Ok(()) => {
                job.complete();
                tracing::info!(
                    job_id = %job.id(),
                    latency_ms = start_time.elapsed().as_millis(),
                    "Job completed"
                );
            }
            Err(e) => {
                if let Err(remove_err) = remove_path(job.artifact_path()).await {
                    tracing::warn!(
                        job_id = %job.id(),
                        error = %remove_err,
                        "Failed to remove partial output"
                    );
                }
                tracing::error!(
                    job_id = %job.id(),
                    error = %e,
                    latency_ms = start_time.elapsed().as_millis(),
                    "Job failed"
                );
                job.fail(e.to_string());
            }
        }
    }

    async fn execute(&self, job: &Job) -> Result<(), JobError> {
        let source_format = self.tts.output_format()?;
        tokio::fs::create_dir_all(job.scratch_dir()).await?;

        let chunks = segment(job.source_text(), self.max_chunk_chars);
        job.advance(SEGMENTED_PROGRESS);
        tracing::debug!(job_id = %job.id(), chunk_count = chunks.len(), "Text segmented");

        let artifacts = self.synthesize_chunks(job, &chunks, source_format).await?;
        job.advance(SYNTHESIZED_PROGRESS);

        ensure_active(job)?;
        self.merger
            .merge(&artifacts, source_format, job.artifact_path(), self.output_format)
            .await?;
        // An eviction during the merge already swept the not-yet-written output
        ensure_active(job)?;
        job.advance(MERGED_PROGRESS);
        tracing::debug!(
            job_id = %job.id(),
            source_format = %source_format,
            target_format = %self.output_format,
            "Chunks merged"
        );

        Ok(())
    }

    async fn synthesize_chunks(
        &self,
        job: &Job,
        chunks: &[String],
        format: AudioFormat,
    ) -> Result<Vec<PathBuf>, JobError> {
        let total = chunks.len();
        let mut artifacts = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            ensure_active(job)?;

            let audio = self
                .tts
                .synthesize(chunk)
                .await
                .map_err(|source| JobError::Synthesis {
                    chunk: index + 1,
                    total,
                    source,
                })?;

            let path = job
                .scratch_dir()
                .join(format!("chunk_{:05}.{}", index, format.extension()));
            tokio::fs::write(&path, audio).await?;
            artifacts.push(path);

            job.advance(chunk_progress(index, total));
            tracing::debug!(
                job_id = %job.id(),
                chunk_index = index,
                chunk_count = total,
                chunk_length = chunk.len(),
                "Chunk synthesized"
            );
        }

        Ok(artifacts)
    }

    async fn remove_scratch(&self, job: &Job) {
        if let Err(e) = remove_path(job.scratch_dir()).await {
            tracing::warn!(
                job_id = %job.id(),
                scratch_dir = %job.scratch_dir().display(),
                error = %e,
                "Failed to remove scratch directory"
            );
        }
    }
}

/// Stop at a stage boundary once the sweeper has evicted the job
fn ensure_active(job: &Job) -> Result<(), JobError> {
    if job.is_cancelled() {
        return Err(JobError::Evicted);
    }
    Ok(())
}
