use bytes::Bytes;

use crate::domain::{DocumentType, GeneratedDocument, JobId};

/// Bundles a job's documents into a single downloadable archive.
pub trait ArtifactPackager: Send + Sync {
    fn file_extension(&self) -> &'static str;

    fn content_type(&self) -> &'static str;

    fn package(
        &self,
        job_id: &JobId,
        documents: &[(DocumentType, GeneratedDocument)],
    ) -> Result<Bytes, PackagingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}
