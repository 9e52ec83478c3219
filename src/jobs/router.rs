use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::domain::{JobDraft, JobId};
use super::repository::JobStore;
use super::service::{JobService, JobServiceError};
use crate::auth::AuthPolicy;
use crate::export;

/// Shared state for the job-board endpoints. Listings and reads are
/// public; mutations sit behind the session guard.
pub struct JobRoutes<S> {
    pub service: Arc<JobService<S>>,
    pub auth: AuthPolicy,
}

impl<S> Clone for JobRoutes<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Router builder for the job board.
pub fn job_router<S>(service: Arc<JobService<S>>, auth: AuthPolicy) -> Router
where
    S: JobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_jobs_handler::<S>).post(create_job_handler::<S>),
        )
        .route("/api/v1/jobs/export/csv", get(export_jobs_csv_handler::<S>))
        .route(
            "/api/v1/jobs/:job_id",
            get(get_job_handler::<S>)
                .put(replace_job_handler::<S>)
                .delete(delete_job_handler::<S>),
        )
        .with_state(JobRoutes { service, auth })
}

async fn list_jobs_handler<S>(State(routes): State<JobRoutes<S>>) -> Response
where
    S: JobStore + 'static,
{
    match routes.service.list() {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_job_handler<S>(
    State(routes): State<JobRoutes<S>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + 'static,
{
    match routes.service.get(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_job_handler<S>(
    State(routes): State<JobRoutes<S>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: JobStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.create(draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn replace_job_handler<S>(
    State(routes): State<JobRoutes<S>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: JobStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.replace(&JobId(job_id), draft) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_job_handler<S>(
    State(routes): State<JobRoutes<S>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: JobStore + 'static,
{
    if let Err(err) = routes.auth.authorize(&headers) {
        return err.into_response();
    }

    match routes.service.delete(&JobId(job_id)) {
        Ok(job) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": format!("Job \"{}\" at {} deleted", job.title, job.company),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

async fn export_jobs_csv_handler<S>(State(routes): State<JobRoutes<S>>) -> Response
where
    S: JobStore + 'static,
{
    let jobs = match routes.service.list() {
        Ok(jobs) => jobs,
        Err(err) => return error_response(err),
    };

    match export::jobs_csv(&jobs) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"jobs.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "jobs CSV export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

fn error_response(err: JobServiceError) -> Response {
    match err {
        JobServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        JobServiceError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        JobServiceError::Store(inner) => {
            tracing::error!(error = %inner, "job store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}
