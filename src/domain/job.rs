use chrono::{DateTime, Utc};

use super::{GenerationRequest, JobId, JobOutputs, JobStatus};

pub const QUEUED_STEP: &str = "Queued";
pub const COMPLETED_STEP: &str = "Completed";

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub current_step: String,
    pub progress: u8,
    pub error: Option<String>,
    pub request: GenerationRequest,
    pub outputs: Option<JobOutputs>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobTransitionError {
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition { from: JobStatus, to: JobStatus },
    #[error("progress cannot move from {current} to {requested}")]
    ProgressRegression { current: u8, requested: u8 },
    #[error("progress {0} is reserved for completed jobs")]
    ProgressOutOfRange(u8),
}

impl Job {
    pub fn new(request: GenerationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            current_step: QUEUED_STEP.to_string(),
            progress: 0,
            error: None,
            request,
            outputs: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn start(&mut self, first_step: &str) -> Result<(), JobTransitionError> {
        self.transition(JobStatus::Processing)?;
        self.current_step = first_step.to_string();
        self.progress = 0;
        self.touch();
        Ok(())
    }

    /// Records a finished stage. Progress must grow and stay below 100 while
    /// the job is still processing.
    pub fn advance(&mut self, step: &str, progress: u8) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Processing {
            return Err(JobTransitionError::IllegalTransition {
                from: self.status,
                to: JobStatus::Processing,
            });
        }
        if progress >= 100 {
            return Err(JobTransitionError::ProgressOutOfRange(progress));
        }
        if progress < self.progress {
            return Err(JobTransitionError::ProgressRegression {
                current: self.progress,
                requested: progress,
            });
        }
        self.current_step = step.to_string();
        self.progress = progress;
        self.touch();
        Ok(())
    }

    pub fn complete(&mut self, outputs: JobOutputs) -> Result<(), JobTransitionError> {
        self.transition(JobStatus::Completed)?;
        self.current_step = COMPLETED_STEP.to_string();
        self.progress = 100;
        self.outputs = Some(outputs);
        self.touch();
        Ok(())
    }

    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), JobTransitionError> {
        self.transition(JobStatus::Failed)?;
        self.error = Some(error.into());
        self.outputs = None;
        self.touch();
        Ok(())
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), JobTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(JobTransitionError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

