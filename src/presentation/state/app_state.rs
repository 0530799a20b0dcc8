use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{ArtifactPackager, GenerationStage, JobRepository};
use crate::application::services::{
    ArtifactService, GenerationService, GenerationWorker, JobRunner,
};
use crate::presentation::config::{ServerSettings, WorkerSettings};

#[derive(Clone)]
pub struct AppState {
    pub generation_service: Arc<GenerationService>,
    pub artifact_service: Arc<ArtifactService>,
}

impl AppState {
    /// Wires the services around one job repository. The returned worker
    /// must be spawned for submitted jobs to make progress.
    pub fn build(
        server: &ServerSettings,
        worker: &WorkerSettings,
        job_repository: Arc<dyn JobRepository>,
        stages: Vec<Arc<dyn GenerationStage>>,
        packager: Arc<dyn ArtifactPackager>,
    ) -> (Self, GenerationWorker) {
        let (sender, receiver) = mpsc::channel(worker.queue_capacity.max(1));

        let runner = JobRunner::new(stages, Arc::clone(&job_repository));
        let generation_worker = GenerationWorker::new(receiver, runner, worker.max_concurrent_jobs);

        let state = Self {
            generation_service: Arc::new(GenerationService::new(
                Arc::clone(&job_repository),
                sender,
            )),
            artifact_service: Arc::new(ArtifactService::new(
                job_repository,
                packager,
                server.download_base_path.clone(),
            )),
        };

        (state, generation_worker)
    }
}
