mod document;
mod download_selector;
mod generation_request;
mod job;
mod job_id;
mod job_status;

pub use document::{DocumentType, GeneratedDocument, JobOutputs};
pub use download_selector::{ANALYSIS_SELECTOR, DownloadSelector, PACKAGE_SELECTOR};
pub use generation_request::{GenerationPreferences, GenerationRequest, Tone, ValidationError};
pub use job::{COMPLETED_STEP, Job, JobTransitionError, QUEUED_STEP};
pub use job_id::JobId;
pub use job_status::JobStatus;
