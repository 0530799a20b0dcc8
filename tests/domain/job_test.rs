use jobcraft::domain::{
    COMPLETED_STEP, Job, JobOutputs, JobStatus, JobTransitionError, QUEUED_STEP,
};

use crate::helpers::sample_request;

#[test]
fn given_new_job_when_created_then_pending_with_zero_progress() {
    let job = Job::new(sample_request());

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.progress, 0);
    assert_eq!(job.current_step, QUEUED_STEP);
    assert!(job.outputs.is_none());
    assert!(job.error.is_none());
}

#[test]
fn given_two_new_jobs_when_created_then_ids_differ() {
    let a = Job::new(sample_request());
    let b = Job::new(sample_request());

    assert_ne!(a.id, b.id);
}

#[test]
fn given_pending_job_when_completing_directly_then_rejected() {
    let mut job = Job::new(sample_request());

    let result = job.complete(JobOutputs::default());

    assert_eq!(
        result,
        Err(JobTransitionError::IllegalTransition {
            from: JobStatus::Pending,
            to: JobStatus::Completed,
        })
    );
    assert!(job.outputs.is_none());
}

#[test]
fn given_started_job_when_advancing_then_step_and_progress_recorded() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.current_step, "Analyzing");

    job.advance("Writing", 33).unwrap();

    assert_eq!(job.current_step, "Writing");
    assert_eq!(job.progress, 33);
}

#[test]
fn given_processing_job_when_progress_regresses_then_rejected() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();
    job.advance("Writing", 50).unwrap();

    let result = job.advance("Analyzing", 10);

    assert_eq!(
        result,
        Err(JobTransitionError::ProgressRegression {
            current: 50,
            requested: 10,
        })
    );
    assert_eq!(job.progress, 50);
    assert_eq!(job.current_step, "Writing");
}

#[test]
fn given_processing_job_when_advancing_to_100_then_rejected() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();

    assert_eq!(
        job.advance("Done", 100),
        Err(JobTransitionError::ProgressOutOfRange(100))
    );
    assert_ne!(job.status, JobStatus::Completed);
}

#[test]
fn given_pending_job_when_advancing_then_rejected() {
    let mut job = Job::new(sample_request());

    assert!(job.advance("Writing", 10).is_err());
    assert_eq!(job.status, JobStatus::Pending);
}

#[test]
fn given_processing_job_when_completed_then_outputs_and_full_progress() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();

    job.complete(JobOutputs::default()).unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.current_step, COMPLETED_STEP);
    assert!(job.outputs.is_some());
    assert!(job.error.is_none());
}

#[test]
fn given_completed_job_when_failing_then_terminal_state_is_kept() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();
    job.complete(JobOutputs::default()).unwrap();

    assert!(job.fail("late failure").is_err());
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());
    assert!(job.outputs.is_some());
}

#[test]
fn given_failed_job_when_restarting_then_rejected() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();
    job.fail("boom").unwrap();

    assert!(job.start("Analyzing").is_err());
    assert_eq!(job.status, JobStatus::Failed);
}

#[test]
fn given_processing_job_when_failed_then_error_set_and_outputs_absent() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();

    job.fail("boom").unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("boom"));
    assert!(job.outputs.is_none());
    assert!(job.progress < 100);
}

#[test]
fn given_processing_job_when_restarting_then_rejected() {
    let mut job = Job::new(sample_request());
    job.start("Analyzing").unwrap();
    job.advance("Writing", 66).unwrap();

    let result = job.start("Analyzing");

    assert_eq!(
        result,
        Err(JobTransitionError::IllegalTransition {
            from: JobStatus::Processing,
            to: JobStatus::Processing,
        })
    );
    assert_eq!(job.progress, 66);
    assert_eq!(job.current_step, "Writing");
}

#[test]
fn given_pending_job_when_failing_then_rejected() {
    let mut job = Job::new(sample_request());

    let result = job.fail("boom");

    assert_eq!(
        result,
        Err(JobTransitionError::IllegalTransition {
            from: JobStatus::Pending,
            to: JobStatus::Failed,
        })
    );
    assert_eq!(job.status, JobStatus::Pending);
    assert!(job.error.is_none());
}
