use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Public identity of a job, as handed out by `POST /generate`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a job id is derived from a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobIdPolicy {
    /// A fresh UUID per submission
    Random,
    /// Lowercase hex SHA-256 of the submitted text
    ContentHash,
}

impl JobIdPolicy {
    pub fn derive(&self, text: &str, run_id: Uuid) -> JobId {
        match self {
            JobIdPolicy::Random => JobId(run_id.to_string()),
            JobIdPolicy::ContentHash => JobId(format!("{:x}", Sha256::digest(text.as_bytes()))),
        }
    }
}

impl FromStr for JobIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(JobIdPolicy::Random),
            "content_hash" | "content-hash" => Ok(JobIdPolicy::ContentHash),
            other => Err(format!("invalid job id policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing)
    }
}

/// Consistent view of a job taken under a single lock acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub error: Option<String>,
    /// Only set once the job has completed
    pub output_path: Option<PathBuf>,
}

#[derive(Debug)]
struct JobState {
    status: JobStatus,
    progress: u8,
    error: Option<String>,
}

/// One text-to-speech request and its pipeline state.
///
/// Only the job's own pipeline mutates `status`, `progress` and `error`
/// (the mutators are crate-private); every other party reads snapshots.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    run_id: Uuid,
    source_text: String,
    created_at: DateTime<Utc>,
    scratch_dir: PathBuf,
    output_path: PathBuf,
    state: RwLock<JobState>,
    cancelled: AtomicBool,
}

impl Job {
    pub fn new(
        id: JobId,
        run_id: Uuid,
        source_text: String,
        created_at: DateTime<Utc>,
        scratch_dir: PathBuf,
        output_path: PathBuf,
    ) -> Self {
        Self {
            id,
            run_id,
            source_text,
            created_at,
            scratch_dir,
            output_path,
            state: RwLock::new(JobState {
                status: JobStatus::Processing,
                progress: 0,
                error: None,
            }),
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Identifies this particular run on disk, distinct from `id` when ids are content hashes
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Where the pipeline writes the final artifact. Use [`Job::snapshot`]
    /// to learn whether it is ready to be served.
    pub(crate) fn artifact_path(&self) -> &Path {
        &self.output_path
    }

    pub fn status(&self) -> JobStatus {
        self.state.read().status
    }

    pub fn snapshot(&self) -> JobSnapshot {
        let state = self.state.read();
        JobSnapshot {
            id: self.id.clone(),
            status: state.status,
            progress: state.progress,
            created_at: self.created_at,
            error: state.error.clone(),
            output_path: (state.status == JobStatus::Completed).then(|| self.output_path.clone()),
        }
    }

    /// `now - created_at > retention`; a clock that went backwards never expires a job
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        match now.signed_duration_since(self.created_at).to_std() {
            Ok(age) => age > retention,
            Err(_) => false,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Raise progress; lower values and updates after a terminal state are ignored
    pub(crate) fn advance(&self, progress: u8) {
        let mut state = self.state.write();
        if state.status == JobStatus::Processing {
            state.progress = state.progress.max(progress.min(100));
        }
    }

    pub(crate) fn complete(&self) {
        let mut state = self.state.write();
        if state.status == JobStatus::Processing {
            state.status = JobStatus::Completed;
            state.progress = 100;
        }
    }

    pub(crate) fn fail(&self, error: String) {
        let mut state = self.state.write();
        if state.status == JobStatus::Processing {
            state.status = JobStatus::Failed;
            state.error = Some(error);
        }
    }
}
