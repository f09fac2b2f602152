use super::model::{Job, JobId, JobIdPolicy, JobStatus};
use super::pipeline::Pipeline;
use super::registry::{JobRegistry, Registration};
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// What a submission resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: JobId,
    /// `Processing` for a new job; the stored status when a live job was reused
    pub status: JobStatus,
}

/// Accepts submissions and starts their pipelines in the background
pub struct JobRunner {
    registry: Arc<JobRegistry>,
    pipeline: Arc<Pipeline>,
    storage: Storage,
    id_policy: JobIdPolicy,
}

impl JobRunner {
    pub fn new(
        registry: Arc<JobRegistry>,
        pipeline: Arc<Pipeline>,
        storage: Storage,
        id_policy: JobIdPolicy,
    ) -> Self {
        Self {
            registry,
            pipeline,
            storage,
            id_policy,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Register a job for `text` and return its id without waiting for the
    /// pipeline. A live job with the same id is reused as is.
    pub fn submit(&self, text: String) -> Submission {
        let run_id = Uuid::new_v4();
        let id = self.id_policy.derive(&text, run_id);
        let job = Arc::new(Job::new(
            id.clone(),
            run_id,
            text,
            Utc::now(),
            self.storage.scratch_dir(&run_id),
            self.storage.result_path(&run_id, self.pipeline.output_format()),
        ));

        match self.registry.register(job.clone()) {
            Registration::Existing(existing) => {
                let status = existing.status();
                tracing::info!(job_id = %id, status = ?status, "Reusing existing job");
                Submission {
                    job_id: existing.id().clone(),
                    status,
                }
            }
            Registration::Registered => {
                tracing::info!(job_id = %id, run_id = %run_id, "Job registered");
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move { pipeline.run(job).await });
                Submission {
                    job_id: id,
                    status: JobStatus::Processing,
                }
            }
        }
    }
}
