mod artifact_packager;
mod generation_stage;
mod job_repository;
mod repository_error;

pub use artifact_packager::{ArtifactPackager, PackagingError};
pub use generation_stage::{GenerationContext, GenerationStage, StageError};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
