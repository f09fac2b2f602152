use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::job::{
        GenerateRequest, GenerateResponse, Job, JobId, JobRegistry, JobRunner, JobStatus, ResultFailedResponse,
        ResultPendingResponse, StatusResponse,
    },
    domain::tts::AudioFormat,
    error::{AppError, AppResult},
};

pub struct JobController {
    runner: Arc<JobRunner>,
    registry: Arc<JobRegistry>,
    output_format: AudioFormat,
}

impl JobController {
    pub fn new(runner: Arc<JobRunner>, registry: Arc<JobRegistry>, output_format: AudioFormat) -> Self {
        Self {
            runner,
            registry,
            output_format,
        }
    }

    /// POST /generate - Start a text-to-speech job
    pub async fn generate(
        State(controller): State<Arc<JobController>>,
        payload: Result<Json<GenerateRequest>, JsonRejection>,
    ) -> AppResult<Json<GenerateResponse>> {
        let text = match payload {
            Ok(Json(GenerateRequest { text: Some(text) })) if !text.trim().is_empty() => text,
            Ok(_) => return Err(AppError::BadRequest("Text is required".to_string())),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected generate payload");
                return Err(AppError::BadRequest("Text is required".to_string()));
            }
        };

        let submission = controller.runner.submit(text);

        Ok(Json(GenerateResponse {
            job_id: submission.job_id,
            status: submission.status,
        }))
    }

    /// GET /status/{job_id} - Poll job progress
    pub async fn status(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<String>,
    ) -> AppResult<Json<StatusResponse>> {
        let job = controller.find(job_id)?;
        Ok(Json(StatusResponse::from(job.snapshot())))
    }

    /// GET /result/{job_id} - Download the finished audio
    pub async fn result(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<String>,
    ) -> AppResult<Response> {
        let snapshot = controller.find(job_id)?.snapshot();

        match snapshot.status {
            JobStatus::Processing => Ok(Json(ResultPendingResponse::from(snapshot)).into_response()),
            JobStatus::Failed => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ResultFailedResponse::from(snapshot)),
            )
                .into_response()),
            JobStatus::Completed => {
                let Some(path) = snapshot.output_path.as_deref() else {
                    return Err(AppError::NotFound("Output file not found".to_string()));
                };

                let audio = match tokio::fs::read(path).await {
                    Ok(audio) => audio,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        tracing::warn!(job_id = %snapshot.id, "Completed job has no output on disk");
                        return Err(AppError::NotFound("Output file not found".to_string()));
                    }
                    Err(e) => return Err(e.into()),
                };

                let format = controller.output_format;
                let disposition = format!(
                    "attachment; filename=\"text_to_speech_{}.{}\"",
                    snapshot.id,
                    format.extension()
                );
                let disposition = HeaderValue::from_str(&disposition)
                    .map_err(|e| AppError::Internal(e.to_string()))?;

                Ok((
                    StatusCode::OK,
                    [
                        (header::CONTENT_TYPE, HeaderValue::from_static(format.mime_type())),
                        (header::CONTENT_DISPOSITION, disposition),
                    ],
                    audio,
                )
                    .into_response())
            }
        }
    }

    fn find(&self, job_id: String) -> AppResult<Arc<Job>> {
        self.registry
            .get(&JobId::from(job_id))
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }
}
