use std::sync::Arc;

use jobcraft::application::ports::{GenerationStage, JobRepository};
use jobcraft::application::services::{
    FINALIZING_STEP, GenerationMessage, GenerationService, GenerationWorker, JobRunner,
    JobStatusView, stage_progress,
};
use jobcraft::domain::{DocumentType, JobStatus};
use jobcraft::infrastructure::persistence::InMemoryJobRepository;
use tokio::sync::mpsc;

use crate::helpers::{
    DocumentStage, FailingStage, GatedStage, PanickingStage, create_job, sample_request,
    wait_for_terminal,
};

fn runner(
    stages: Vec<Arc<dyn GenerationStage>>,
) -> (JobRunner, Arc<InMemoryJobRepository>) {
    let repository = Arc::new(InMemoryJobRepository::new());
    let job_repository: Arc<dyn JobRepository> = repository.clone();
    (JobRunner::new(stages, job_repository), repository)
}

#[test]
fn given_any_stage_count_when_computing_progress_then_strictly_increasing_below_100() {
    for total in 1..=40 {
        let mut previous = 0;
        for index in 0..total {
            let progress = stage_progress(index, total);
            assert!(progress > previous);
            assert!(progress < 100);
            previous = progress;
        }
    }
}

#[tokio::test]
async fn given_succeeding_stages_when_running_job_then_completed_with_all_outputs() {
    let (runner, repository) = runner(vec![
        Arc::new(DocumentStage::new("resume")),
        Arc::new(DocumentStage::new("cover_letter")),
    ]);
    let job_id = create_job(&repository).await;

    runner
        .run_job(GenerationMessage {
            job_id: job_id.clone(),
            request: sample_request(),
        })
        .await
        .unwrap();

    let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert!(job.error.is_none());

    let outputs = job.outputs.unwrap();
    assert!(outputs.document(&DocumentType::new("resume")).is_some());
    assert!(outputs.document(&DocumentType::new("cover_letter")).is_some());
    assert_eq!(outputs.analysis["resume"], "contents of resume");
}

#[tokio::test]
async fn given_failing_stage_when_running_job_then_failed_without_partial_outputs() {
    let (runner, repository) = runner(vec![
        Arc::new(DocumentStage::new("resume")),
        Arc::new(FailingStage::new("quota exceeded")),
        Arc::new(DocumentStage::new("cover_letter")),
    ]);
    let job_id = create_job(&repository).await;

    runner
        .run_job(GenerationMessage {
            job_id: job_id.clone(),
            request: sample_request(),
        })
        .await
        .unwrap();

    let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    let error = job.error.unwrap();
    assert!(error.contains("Failing stage"));
    assert!(error.contains("quota exceeded"));
    assert!(job.outputs.is_none());
    assert_eq!(job.current_step, "Failing stage");
}

#[tokio::test]
async fn given_no_stages_when_running_job_then_completed_with_empty_outputs() {
    let (runner, repository) = runner(vec![]);
    let job_id = create_job(&repository).await;

    runner
        .run_job(GenerationMessage {
            job_id: job_id.clone(),
            request: sample_request(),
        })
        .await
        .unwrap();

    let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.outputs.unwrap().documents.is_empty());
}

#[tokio::test]
async fn given_stage_emitting_reserved_document_type_when_running_job_then_failed() {
    let (runner, repository) = runner(vec![
        Arc::new(DocumentStage::new("resume")),
        Arc::new(DocumentStage::new("package")),
    ]);
    let job_id = create_job(&repository).await;

    runner
        .run_job(GenerationMessage {
            job_id: job_id.clone(),
            request: sample_request(),
        })
        .await
        .unwrap();

    let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("'package' is reserved"));
    assert!(job.outputs.is_none());
}

#[tokio::test]
async fn given_unknown_job_when_running_then_repository_error() {
    let (runner, _repository) = runner(vec![Arc::new(DocumentStage::new("resume"))]);

    let result = runner
        .run_job(GenerationMessage {
            job_id: jobcraft::domain::JobId::from_raw("missing"),
            request: sample_request(),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn given_gated_stage_when_job_mid_pipeline_then_step_and_progress_reflect_last_stage() {
    let (gated, gate) = GatedStage::new();
    let (runner, repository) = runner(vec![
        Arc::new(DocumentStage::new("resume")),
        Arc::new(gated),
        Arc::new(DocumentStage::new("cover_letter")),
    ]);
    let job_id = create_job(&repository).await;

    let task_runner = runner.clone();
    let task_job_id = job_id.clone();
    let handle = tokio::spawn(async move {
        task_runner
            .run_job(GenerationMessage {
                job_id: task_job_id,
                request: sample_request(),
            })
            .await
    });

    let mut observed = None;
    for _ in 0..200 {
        let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
        if job.progress > 0 {
            observed = Some(job);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    let job = observed.expect("first stage never finished");
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.current_step, "Waiting on gate");
    assert_eq!(job.progress, stage_progress(0, 3));
    assert!(job.outputs.is_none());

    gate.add_permits(1);
    handle.await.unwrap().unwrap();

    let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_ne!(job.current_step, FINALIZING_STEP);
}

fn worker_with(
    stages: Vec<Arc<dyn GenerationStage>>,
    max_concurrent_jobs: usize,
) -> (GenerationService, Arc<InMemoryJobRepository>) {
    let repository = Arc::new(InMemoryJobRepository::new());
    let job_repository: Arc<dyn JobRepository> = repository.clone();
    let (sender, receiver) = mpsc::channel(8);

    let worker = GenerationWorker::new(
        receiver,
        JobRunner::new(stages, Arc::clone(&job_repository)),
        max_concurrent_jobs,
    );
    tokio::spawn(worker.run());

    (GenerationService::new(job_repository, sender), repository)
}

#[tokio::test]
async fn given_panicking_stage_when_worker_runs_job_then_job_marked_failed() {
    let (service, repository) = worker_with(vec![Arc::new(PanickingStage)], 2);

    let job_id = service
        .submit(
            Some("u-1".to_string()),
            Some("Engineer at Acme".to_string()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(wait_for_terminal(&service, &job_id).await, JobStatus::Failed);
    let job = repository.get_by_id(&job_id).await.unwrap().unwrap();
    assert!(job.error.unwrap().contains("aborted"));
}

#[tokio::test]
async fn given_slow_job_when_fast_job_submitted_then_fast_job_finishes_first() {
    let (gated, gate) = GatedStage::for_description("Slow");
    let stages: Vec<Arc<dyn GenerationStage>> =
        vec![Arc::new(gated), Arc::new(DocumentStage::new("resume"))];
    let (service, _repository) = worker_with(stages, 2);

    let slow = service
        .submit(Some("u-1".to_string()), Some("Slow".to_string()), None)
        .await
        .unwrap();
    let fast = service
        .submit(Some("u-2".to_string()), Some("Fast".to_string()), None)
        .await
        .unwrap();

    assert_eq!(wait_for_terminal(&service, &fast).await, JobStatus::Completed);

    let view = service.get_status(&slow).await.unwrap();
    assert!(matches!(
        view,
        JobStatusView::Found(s) if !s.status.is_terminal() && s.progress < 100
    ));

    gate.add_permits(1);
    assert_eq!(wait_for_terminal(&service, &slow).await, JobStatus::Completed);
}
