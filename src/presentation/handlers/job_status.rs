use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::JobStatusView;
use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::error_response::repository_error_response;

pub const NOT_FOUND_STATUS: &str = "not_found";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatusResponse {
    fn from_view(job_id: &JobId, view: JobStatusView) -> Self {
        match view {
            JobStatusView::NotFound => Self {
                job_id: job_id.to_string(),
                status: NOT_FOUND_STATUS.to_string(),
                current_step: None,
                progress: None,
                error: None,
            },
            JobStatusView::Found(snapshot) => Self {
                job_id: snapshot.job_id.to_string(),
                status: snapshot.status.as_str().to_string(),
                current_step: Some(snapshot.current_step),
                progress: Some(snapshot.progress),
                error: snapshot.error,
            },
        }
    }
}

/// Unknown ids answer 200 with `status: "not_found"`, never a 404, so
/// pollers can stop on the body alone.
#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let job_id = JobId::from_raw(job_id);

    match state.generation_service.get_status(&job_id).await {
        Ok(view) => (
            StatusCode::OK,
            Json(JobStatusResponse::from_view(&job_id, view)),
        )
            .into_response(),
        Err(e) => repository_error_response(&e),
    }
}
