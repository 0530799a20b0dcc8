mod download;
mod error_response;
mod generate;
mod health;
mod job_status;

pub use download::{download_artifact_handler, download_handler};
pub use error_response::ErrorResponse;
pub use generate::generate_handler;
pub use health::health_handler;
pub use job_status::{NOT_FOUND_STATUS, job_status_handler};
