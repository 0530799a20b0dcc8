use std::collections::BTreeMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::{Artifact, ArtifactStream, DownloadDirectory};
use crate::domain::{DownloadSelector, JobId};
use crate::presentation::state::AppState;

use super::error_response::artifact_error_response;

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDirectoryResponse {
    pub job_id: String,
    pub download_links: BTreeMap<String, String>,
    pub package_link: String,
    pub analysis_link: String,
}

impl From<DownloadDirectory> for DownloadDirectoryResponse {
    fn from(directory: DownloadDirectory) -> Self {
        Self {
            job_id: directory.job_id.to_string(),
            download_links: directory.download_links,
            package_link: directory.package_link,
            analysis_link: directory.analysis_link,
        }
    }
}

/// `GET /api/download/{job_id}`: the link directory, or the packaged
/// archive when `format=package`.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let selector = DownloadSelector::from_request(None, query.format.as_deref());
    resolve(&state, JobId::from_raw(job_id), selector).await
}

/// `GET /api/download/{job_id}/{selector}` where selector is `package`,
/// `analysis` or a document type.
#[tracing::instrument(skip(state))]
pub async fn download_artifact_handler(
    State(state): State<AppState>,
    Path((job_id, selector)): Path<(String, String)>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let selector = DownloadSelector::from_request(Some(&selector), query.format.as_deref());
    resolve(&state, JobId::from_raw(job_id), selector).await
}

async fn resolve(state: &AppState, job_id: JobId, selector: DownloadSelector) -> Response {
    match state.artifact_service.resolve(&job_id, selector).await {
        Ok(Artifact::Directory(directory)) => (
            StatusCode::OK,
            Json(DownloadDirectoryResponse::from(directory)),
        )
            .into_response(),
        Ok(Artifact::Analysis(analysis)) => (StatusCode::OK, Json(analysis)).into_response(),
        Ok(Artifact::Stream(artifact)) => stream_response(artifact),
        Err(e) => {
            tracing::debug!(job_id = %job_id, error = %e, "Download refused");
            artifact_error_response(&e)
        }
    }
}

fn stream_response(artifact: ArtifactStream) -> Response {
    tracing::debug!(
        filename = %artifact.filename,
        bytes = artifact.content_length,
        "Streaming artifact"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type),
            (header::CONTENT_LENGTH, artifact.content_length.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        Body::from_stream(artifact.stream),
    )
        .into_response()
}
