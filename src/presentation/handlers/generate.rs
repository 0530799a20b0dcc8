use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::{GenerationPreferences, JobStatus};
use crate::infrastructure::observability::text_preview;
use crate::presentation::state::AppState;

use super::error_response::{error_response, submission_error_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub upload_id: Option<String>,
    pub job_description: Option<String>,
    #[serde(default)]
    pub preferences: Option<GenerationPreferences>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub status_url: String,
    pub message: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected generate request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "validation",
                format!("Invalid request body: {}", rejection.body_text()),
            );
        }
    };

    if let Some(description) = &request.job_description {
        tracing::debug!(description = %text_preview(description), "Generate request received");
    }

    match state
        .generation_service
        .submit(
            request.upload_id,
            request.job_description,
            request.preferences,
        )
        .await
    {
        Ok(job_id) => (
            StatusCode::CREATED,
            Json(GenerateResponse {
                status_url: format!("/api/generate/{}/status", job_id),
                job_id: job_id.to_string(),
                status: JobStatus::Pending,
                message: "Document generation started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Generate request rejected");
            submission_error_response(&e)
        }
    }
}
