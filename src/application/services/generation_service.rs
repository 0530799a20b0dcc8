use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{
    GenerationPreferences, GenerationRequest, Job, JobId, JobStatus, ValidationError,
};

use super::GenerationMessage;

/// Latest state of a job as seen by a polling client.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatusView {
    NotFound,
    Found(JobSnapshot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    pub current_step: String,
    pub progress: u8,
    pub error: Option<String>,
}

impl From<&Job> for JobSnapshot {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            status: job.status,
            current_step: job.current_step.clone(),
            progress: job.progress,
            error: job.error.clone(),
        }
    }
}

/// Accepts generation requests and answers status polls.
pub struct GenerationService {
    job_repository: Arc<dyn JobRepository>,
    sender: mpsc::Sender<GenerationMessage>,
}

impl GenerationService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        sender: mpsc::Sender<GenerationMessage>,
    ) -> Self {
        Self {
            job_repository,
            sender,
        }
    }

    /// Validates the request, reserves a queue slot, records a pending job
    /// and hands it to the worker. Returns as soon as the job is queued; a
    /// closed queue leaves no job record behind.
    pub async fn submit(
        &self,
        upload_id: Option<String>,
        job_description: Option<String>,
        preferences: Option<GenerationPreferences>,
    ) -> Result<JobId, SubmissionError> {
        let request = GenerationRequest::new(upload_id, job_description, preferences)?;

        let permit = self.sender.reserve().await.map_err(|_| {
            tracing::error!("Generation queue closed");
            SubmissionError::QueueUnavailable
        })?;

        let job = Job::new(request.clone());
        let job_id = job.id.clone();

        self.job_repository.create(&job).await?;

        permit.send(GenerationMessage {
            job_id: job_id.clone(),
            request,
        });

        tracing::info!(
            job_id = %job_id,
            upload_id = %job.request.upload_id,
            "Generation job enqueued"
        );

        Ok(job_id)
    }

    pub async fn get_status(&self, job_id: &JobId) -> Result<JobStatusView, RepositoryError> {
        let view = match self.job_repository.get_by_id(job_id).await? {
            Some(job) => JobStatusView::Found(JobSnapshot::from(&job)),
            None => JobStatusView::NotFound,
        };
        Ok(view)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("generation queue unavailable")]
    QueueUnavailable,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
