use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::directory::UnderwriterDirectory;
use super::domain::MappedFormOutput;
use super::lifecycle::SubmissionId;
use super::repository::{RepositoryError, SubmissionRecord, SubmissionRepository};
use super::service::{SubmissionService, SubmissionServiceError, DEFAULT_TOP_N};

/// Router builder exposing the submission workflow over HTTP.
pub fn submission_router<R, D>(service: Arc<SubmissionService<R, D>>) -> Router
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    Router::new()
        .route("/api/v1/submissions", post(submit_handler::<R, D>))
        .route(
            "/api/v1/submissions/:submission_id",
            get(status_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/route",
            post(route_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/approve",
            post(approve_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/schedule",
            post(schedule_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/dispatch",
            post(dispatch_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/acknowledge",
            post(acknowledge_handler::<R, D>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RouteRequest {
    #[serde(default)]
    top_n: Option<usize>,
    #[serde(default)]
    at: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EventRequest {
    #[serde(default)]
    at: Option<NaiveDateTime>,
}

fn now_or(at: Option<NaiveDateTime>) -> NaiveDateTime {
    at.unwrap_or_else(|| Local::now().naive_local())
}

fn record_response(status: StatusCode, record: SubmissionRecord) -> Response {
    (status, Json(record.status_view())).into_response()
}

fn error_response(error: SubmissionServiceError) -> Response {
    let status = match &error {
        SubmissionServiceError::Transition(_) => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SubmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Json(mapped): Json<MappedFormOutput>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    match service.intake(mapped, now_or(None)) {
        Ok(record) => record_response(StatusCode::ACCEPTED, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    let id = SubmissionId(submission_id);
    match service.get(&id) {
        Ok(record) => record_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn route_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Path(submission_id): Path<String>,
    payload: Option<Json<RouteRequest>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    let id = SubmissionId(submission_id);
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let top_n = request.top_n.unwrap_or(DEFAULT_TOP_N);

    match service.route(&id, top_n, now_or(request.at)) {
        Ok(record) => record_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Path(submission_id): Path<String>,
    payload: Option<Json<EventRequest>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    let id = SubmissionId(submission_id);
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match service.approve(&id, now_or(request.at)) {
        Ok(record) => record_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Path(submission_id): Path<String>,
    payload: Option<Json<EventRequest>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    let id = SubmissionId(submission_id);
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match service.schedule(&id, now_or(request.at)) {
        Ok(record) => record_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dispatch_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Path(submission_id): Path<String>,
    payload: Option<Json<EventRequest>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    let id = SubmissionId(submission_id);
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match service.dispatch(&id, now_or(request.at)) {
        Ok(record) => record_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn acknowledge_handler<R, D>(
    State(service): State<Arc<SubmissionService<R, D>>>,
    Path(submission_id): Path<String>,
    payload: Option<Json<EventRequest>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    let id = SubmissionId(submission_id);
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match service.acknowledge(&id, now_or(request.at)) {
        Ok(record) => record_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}
