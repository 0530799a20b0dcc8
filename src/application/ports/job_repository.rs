use async_trait::async_trait;

use crate::domain::{Job, JobId, JobOutputs};

use super::RepositoryError;

/// Registry of generation jobs and the single source of truth for their
/// status. Every mutation is applied atomically to one job record; readers
/// only ever see whole snapshots.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;

    async fn start(&self, id: &JobId, first_step: &str) -> Result<(), RepositoryError>;

    async fn update_progress(
        &self,
        id: &JobId,
        step: &str,
        progress: u8,
    ) -> Result<(), RepositoryError>;

    async fn complete(&self, id: &JobId, outputs: JobOutputs) -> Result<(), RepositoryError>;

    async fn fail(&self, id: &JobId, error: &str) -> Result<(), RepositoryError>;
}
