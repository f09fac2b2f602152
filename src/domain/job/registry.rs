use super::model::{Job, JobId, JobStatus};
use crate::infrastructure::storage::{remove_path, Storage};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Outcome of [`JobRegistry::register`]
#[derive(Debug)]
pub enum Registration {
    /// The job was stored and its pipeline should be started
    Registered,
    /// A live job with the same id already exists; nothing was stored
    Existing(Arc<Job>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub evicted_jobs: usize,
    pub removed_files: usize,
}

/// In-memory job table plus the sweeper that reclaims expired jobs.
///
/// The lock is only held for map operations, never across file deletion.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Arc<Job>>>,
    storage: Storage,
}

impl JobRegistry {
    pub fn new(storage: Storage) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            storage,
        }
    }

    /// Store a job unless a non-failed job with the same id is present.
    /// A failed job under that id is replaced.
    pub fn register(&self, job: Arc<Job>) -> Registration {
        let mut jobs = self.jobs.write();

        if let Some(existing) = jobs.get(job.id()) {
            if existing.status() != JobStatus::Failed {
                return Registration::Existing(existing.clone());
            }
        }

        jobs.insert(job.id().clone(), job);
        Registration::Registered
    }

    pub fn get(&self, id: &JobId) -> Option<Arc<Job>> {
        self.jobs.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// Number of jobs still processing
    pub fn active_count(&self) -> usize {
        self.jobs
            .read()
            .values()
            .filter(|job| job.status() == JobStatus::Processing)
            .count()
    }

    /// Evict every job older than `retention` (whatever its status) with its
    /// files, then delete stale entries left in the storage areas.
    pub async fn sweep(&self, now: DateTime<Utc>, retention: Duration) -> SweepReport {
        let mut expired = Vec::new();
        self.jobs.write().retain(|_, job| {
            if job.is_expired(now, retention) {
                expired.push(job.clone());
                false
            } else {
                true
            }
        });

        let mut report = SweepReport {
            evicted_jobs: expired.len(),
            removed_files: 0,
        };

        for job in &expired {
            if job.status() == JobStatus::Processing {
                tracing::warn!(job_id = %job.id(), "Evicting job that is still processing");
                job.cancel();
            }

            for path in [job.artifact_path(), job.scratch_dir()] {
                match remove_path(path).await {
                    Ok(true) => report.removed_files += 1,
                    Ok(false) => {}
                    Err(e) => tracing::warn!(
                        job_id = %job.id(),
                        path = %path.display(),
                        error = %e,
                        "Failed to remove job artifact"
                    ),
                }
            }
        }

        report.removed_files += self.storage.remove_stale(now.into(), retention).await;

        tracing::info!(
            evicted_jobs = report.evicted_jobs,
            removed_files = report.removed_files,
            remaining_jobs = self.len(),
            "Job sweep completed"
        );

        report
    }

    /// Sweep on a fixed interval in a background task
    pub fn start_sweeper(self: Arc<Self>, interval: Duration, retention: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.sweep(Utc::now(), retention).await;
            }
        })
    }
}
