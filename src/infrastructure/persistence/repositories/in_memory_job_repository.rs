use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobOutputs};

type JobCell = Arc<RwLock<Job>>;

/// Keeps jobs in process memory. The registry lock is held only to look up
/// or insert a record; each job carries its own lock, so updates to one job
/// never wait on another.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, JobCell>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn cell(&self, id: &JobId) -> Result<JobCell, RepositoryError> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job id already used: {}",
                job.id
            )));
        }
        jobs.insert(job.id.clone(), Arc::new(RwLock::new(job.clone())));
        Ok(())
    }

    async fn get_by_id(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let cell = self.jobs.read().await.get(id).cloned();
        match cell {
            Some(cell) => Ok(Some(cell.read().await.clone())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn start(&self, id: &JobId, first_step: &str) -> Result<(), RepositoryError> {
        let cell = self.cell(id).await?;
        cell.write().await.start(first_step)?;
        Ok(())
    }

    async fn update_progress(
        &self,
        id: &JobId,
        step: &str,
        progress: u8,
    ) -> Result<(), RepositoryError> {
        let cell = self.cell(id).await?;
        cell.write().await.advance(step, progress)?;
        Ok(())
    }

    #[instrument(skip(self, outputs), fields(job_id = %id))]
    async fn complete(&self, id: &JobId, outputs: JobOutputs) -> Result<(), RepositoryError> {
        let cell = self.cell(id).await?;
        cell.write().await.complete(outputs)?;
        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn fail(&self, id: &JobId, error: &str) -> Result<(), RepositoryError> {
        let cell = self.cell(id).await?;
        cell.write().await.fail(error)?;
        Ok(())
    }
}
