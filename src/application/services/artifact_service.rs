use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, BoxStream};

use crate::application::ports::{ArtifactPackager, JobRepository, PackagingError, RepositoryError};
use crate::domain::{
    ANALYSIS_SELECTOR, DocumentType, DownloadSelector, JobId, JobOutputs, JobStatus,
    PACKAGE_SELECTOR,
};

const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Resolves download requests for completed jobs.
pub struct ArtifactService {
    job_repository: Arc<dyn JobRepository>,
    packager: Arc<dyn ArtifactPackager>,
    download_base_path: String,
}

#[derive(Debug)]
pub enum Artifact {
    Directory(DownloadDirectory),
    Stream(ArtifactStream),
    Analysis(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadDirectory {
    pub job_id: JobId,
    pub download_links: BTreeMap<String, String>,
    pub package_link: String,
    pub analysis_link: String,
}

/// A byte stream owned by a single response.
pub struct ArtifactStream {
    pub filename: String,
    pub content_type: String,
    pub content_length: u64,
    pub stream: BoxStream<'static, Result<Bytes, io::Error>>,
}

impl ArtifactStream {
    pub fn from_bytes(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        let content_length = content.len() as u64;
        let chunks: Vec<Result<Bytes, io::Error>> = (0..content.len())
            .step_by(STREAM_CHUNK_SIZE)
            .map(|start| {
                let end = (start + STREAM_CHUNK_SIZE).min(content.len());
                Ok(content.slice(start..end))
            })
            .collect();

        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content_length,
            stream: Box::pin(stream::iter(chunks)),
        }
    }
}

impl fmt::Debug for ArtifactStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStream")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

impl ArtifactService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        packager: Arc<dyn ArtifactPackager>,
        download_base_path: impl Into<String>,
    ) -> Self {
        Self {
            job_repository,
            packager,
            download_base_path: download_base_path.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn resolve(
        &self,
        job_id: &JobId,
        selector: DownloadSelector,
    ) -> Result<Artifact, ArtifactError> {
        let outputs = self.completed_outputs(job_id).await?;

        match selector {
            DownloadSelector::Directory => Ok(Artifact::Directory(self.directory(job_id, &outputs))),
            DownloadSelector::Analysis => Ok(Artifact::Analysis(outputs.analysis)),
            DownloadSelector::Document(document_type) => {
                let document = outputs.document(&document_type).ok_or_else(|| {
                    ArtifactError::UnknownDocumentType {
                        job_id: job_id.clone(),
                        document_type: document_type.clone(),
                    }
                })?;
                Ok(Artifact::Stream(ArtifactStream::from_bytes(
                    document.filename.clone(),
                    document.content_type.clone(),
                    document.content.clone(),
                )))
            }
            DownloadSelector::Package => self.package(job_id, outputs).await.map(Artifact::Stream),
        }
    }

    /// Loads a snapshot of the job's outputs. The repository hands back an
    /// owned copy, so nothing downstream holds the job's lock.
    async fn completed_outputs(&self, job_id: &JobId) -> Result<JobOutputs, ArtifactError> {
        let job = self
            .job_repository
            .get_by_id(job_id)
            .await?
            .ok_or_else(|| ArtifactError::NotFound(job_id.clone()))?;

        match job.status {
            JobStatus::Pending | JobStatus::Processing => Err(ArtifactError::NotReady {
                job_id: job_id.clone(),
                status: job.status,
            }),
            JobStatus::Failed => Err(ArtifactError::JobFailed {
                job_id: job_id.clone(),
                error: job.error.unwrap_or_default(),
            }),
            JobStatus::Completed => job.outputs.ok_or_else(|| {
                ArtifactError::Internal(format!("completed job {} has no outputs", job_id))
            }),
        }
    }

    fn directory(&self, job_id: &JobId, outputs: &JobOutputs) -> DownloadDirectory {
        let job_base = format!("{}/{}", self.download_base_path, job_id);
        let download_links = outputs
            .document_types()
            .map(|t| (t.as_str().to_string(), format!("{}/{}", job_base, t)))
            .collect();

        DownloadDirectory {
            job_id: job_id.clone(),
            download_links,
            package_link: format!("{}/{}", job_base, PACKAGE_SELECTOR),
            analysis_link: format!("{}/{}", job_base, ANALYSIS_SELECTOR),
        }
    }

    async fn package(
        &self,
        job_id: &JobId,
        outputs: JobOutputs,
    ) -> Result<ArtifactStream, ArtifactError> {
        let packager = Arc::clone(&self.packager);
        let documents: Vec<_> = outputs.documents.into_iter().collect();
        let archive_job_id = job_id.clone();

        let archive = tokio::task::spawn_blocking(move || {
            packager.package(&archive_job_id, &documents)
        })
        .await
        .map_err(|e| ArtifactError::Internal(format!("packaging task failed: {}", e)))??;

        tracing::debug!(job_id = %job_id, bytes = archive.len(), "Package built");

        Ok(ArtifactStream::from_bytes(
            format!("{}_package.{}", job_id, self.packager.file_extension()),
            self.packager.content_type(),
            archive,
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {job_id} is not ready (status: {status})")]
    NotReady { job_id: JobId, status: JobStatus },
    #[error("job {job_id} failed: {error}")]
    JobFailed { job_id: JobId, error: String },
    #[error("job {job_id} has no document of type '{document_type}'")]
    UnknownDocumentType {
        job_id: JobId,
        document_type: DocumentType,
    },
    #[error("packaging: {0}")]
    Packaging(#[from] PackagingError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("internal: {0}")]
    Internal(String),
}
