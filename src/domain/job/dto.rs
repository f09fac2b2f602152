use super::model::{JobId, JobSnapshot, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request for POST /generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: Option<String>,
}

/// Response for POST /generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub job_id: JobId,
    pub status: JobStatus,
}

/// Response for GET /status/{job_id}
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<JobSnapshot> for StatusResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        Self {
            job_id: snapshot.id,
            status: snapshot.status,
            created_at: snapshot.created_at,
            progress: snapshot.progress,
            error: snapshot.error,
        }
    }
}

/// GET /result/{job_id} while the job is still running
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultPendingResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub message: String,
}

impl From<JobSnapshot> for ResultPendingResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        Self {
            job_id: snapshot.id,
            status: snapshot.status,
            message: "Audio generation is still in progress".to_string(),
        }
    }
}

/// GET /result/{job_id} for a failed job
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultFailedResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub error: String,
}

impl From<JobSnapshot> for ResultFailedResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        Self {
            job_id: snapshot.id,
            status: snapshot.status,
            error: snapshot.error.unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}
