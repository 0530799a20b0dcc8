use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::application::services::{ArtifactError, SubmissionError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_error: Option<String>,
}

pub fn error_response(status: StatusCode, kind: &'static str, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            kind,
            job_error: None,
        }),
    )
        .into_response()
}

pub fn repository_error_response(e: &RepositoryError) -> Response {
    tracing::error!(error = %e, "Job repository failure");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string())
}

pub fn submission_error_response(e: &SubmissionError) -> Response {
    match e {
        SubmissionError::Validation(v) => {
            error_response(StatusCode::BAD_REQUEST, "validation", v.to_string())
        }
        SubmissionError::QueueUnavailable => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "queue_unavailable",
            e.to_string(),
        ),
        SubmissionError::Repository(r) => repository_error_response(r),
    }
}

/// Keeps not-ready, failed and unknown jobs distinguishable by both status
/// code and `kind`.
pub fn artifact_error_response(e: &ArtifactError) -> Response {
    match e {
        ArtifactError::NotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        ArtifactError::NotReady { .. } => {
            error_response(StatusCode::CONFLICT, "not_ready", e.to_string())
        }
        ArtifactError::JobFailed { error, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
                kind: "job_failed",
                job_error: Some(error.clone()),
            }),
        )
            .into_response(),
        ArtifactError::UnknownDocumentType { .. } => error_response(
            StatusCode::NOT_FOUND,
            "unknown_document_type",
            e.to_string(),
        ),
        ArtifactError::Repository(r) => repository_error_response(r),
        ArtifactError::Packaging(_) | ArtifactError::Internal(_) => {
            tracing::error!(error = %e, "Failed to resolve artifact");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                e.to_string(),
            )
        }
    }
}
