mod artifact_service;
mod generation_service;
mod generation_worker;

pub use artifact_service::{
    Artifact, ArtifactError, ArtifactService, ArtifactStream, DownloadDirectory,
};
pub use generation_service::{GenerationService, JobSnapshot, JobStatusView, SubmissionError};
pub use generation_worker::{
    FINALIZING_STEP, GenerationMessage, GenerationWorker, GenerationWorkerError, JobRunner,
    stage_progress,
};
