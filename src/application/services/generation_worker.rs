use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::Instrument;

use crate::application::ports::{
    GenerationContext, GenerationStage, JobRepository, RepositoryError, StageError,
};
use crate::domain::{GenerationRequest, JobId};

pub const FINALIZING_STEP: &str = "Finalizing documents";

pub struct GenerationMessage {
    pub job_id: JobId,
    pub request: GenerationRequest,
}

/// Progress reported once stage `index` (zero based) of `total` has finished.
/// Stays below 100, which only a completed job may report.
pub fn stage_progress(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (((index + 1) * 99) / total).min(99) as u8
}

/// Drives a single job through the ordered stages and records every
/// transition in the job repository.
#[derive(Clone)]
pub struct JobRunner {
    stages: Arc<[Arc<dyn GenerationStage>]>,
    job_repository: Arc<dyn JobRepository>,
}

impl JobRunner {
    pub fn new(
        stages: Vec<Arc<dyn GenerationStage>>,
        job_repository: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            stages: stages.into(),
            job_repository,
        }
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name().to_string()).collect()
    }

    pub async fn run_job(&self, msg: GenerationMessage) -> Result<(), GenerationWorkerError> {
        let job_id = msg.job_id;
        let first_step = self
            .stages
            .first()
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| FINALIZING_STEP.to_string());

        self.job_repository.start(&job_id, &first_step).await?;
        tracing::debug!(step = %first_step, "Job status transition: processing");

        let mut context = GenerationContext::new(job_id.clone(), msg.request);

        match self.run_stages(&job_id, &mut context).await {
            Ok(()) => {
                let outputs = context.into_outputs();
                let documents = outputs.documents.len();
                self.job_repository.complete(&job_id, outputs).await?;
                tracing::info!(documents, "Generation completed");
                Ok(())
            }
            Err(GenerationWorkerError::Stage { stage, source }) => {
                let error_msg = format!("{}: {}", stage, source);
                self.job_repository.fail(&job_id, &error_msg).await?;
                tracing::warn!(stage = %stage, error = %source, "Generation failed");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Marks a job whose task died without reaching a terminal state.
    pub async fn record_abort(&self, job_id: &JobId, reason: &str) {
        if let Err(e) = self.job_repository.fail(job_id, reason).await {
            tracing::error!(job_id = %job_id, error = %e, "Failed to record aborted job");
        }
    }

    async fn run_stages(
        &self,
        job_id: &JobId,
        context: &mut GenerationContext,
    ) -> Result<(), GenerationWorkerError> {
        let total = self.stages.len();

        for (index, stage) in self.stages.iter().enumerate() {
            tracing::debug!(stage = %stage.name(), index, total, "Running stage");

            stage
                .run(context)
                .await
                .map_err(|source| GenerationWorkerError::Stage {
                    stage: stage.name().to_string(),
                    source,
                })?;

            let next_step = self
                .stages
                .get(index + 1)
                .map(|s| s.name())
                .unwrap_or(FINALIZING_STEP);
            let progress = stage_progress(index, total);

            self.job_repository
                .update_progress(job_id, next_step, progress)
                .await?;
            tracing::debug!(step = %next_step, progress, "Job progress");
        }

        Ok(())
    }
}

pub struct GenerationWorker {
    receiver: mpsc::Receiver<GenerationMessage>,
    runner: JobRunner,
    permits: Arc<Semaphore>,
}

impl GenerationWorker {
    pub fn new(
        receiver: mpsc::Receiver<GenerationMessage>,
        runner: JobRunner,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            receiver,
            runner,
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    /// Consumes the queue until every sender is dropped. Each job runs in
    /// its own task so a slow or failing job never holds up the others.
    pub async fn run(mut self) {
        tracing::info!(stages = ?self.runner.stage_names(), "Generation worker started");

        while let Some(msg) = self.receiver.recv().await {
            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };

            let span = tracing::info_span!("generation_job", job_id = %msg.job_id);
            let runner = self.runner.clone();

            tokio::spawn(
                async move {
                    let job_id = msg.job_id.clone();
                    let task_runner = runner.clone();
                    let handle = tokio::spawn(
                        async move { task_runner.run_job(msg).await }.in_current_span(),
                    );

                    match handle.await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            tracing::error!(error = %e, "Generation job failed");
                            runner.record_abort(&job_id, &e.to_string()).await;
                        }
                        Err(join_error) => {
                            tracing::error!(error = %join_error, "Generation task aborted");
                            runner
                                .record_abort(&job_id, "generation task aborted unexpectedly")
                                .await;
                        }
                    }

                    drop(permit);
                }
                .instrument(span),
            );
        }

        tracing::info!("Generation worker stopped: channel closed");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationWorkerError {
    #[error("stage '{stage}': {source}")]
    Stage {
        stage: String,
        #[source]
        source: StageError,
    },
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
