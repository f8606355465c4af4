use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AssessmentId, AssessmentInput};
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};
use crate::identity::acting_user;
use crate::workflows::reports::ReportRepository;
use crate::workflows::responses::{bad_json, internal_error, not_found};

/// Bulk submission body: `{"processes": [...]}`.
#[derive(Debug, Deserialize)]
pub struct BulkAssessmentRequest {
    pub processes: Vec<AssessmentInput>,
}

/// Router exposing assessment CRUD, bulk intake, and the dashboard roll-up.
pub fn assessment_router<R, P>(service: Arc<AssessmentService<R, P>>) -> Router
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            get(list_handler::<R, P>).post(create_handler::<R, P>),
        )
        .route("/api/v1/assessments/bulk", post(bulk_handler::<R, P>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(detail_handler::<R, P>)
                .put(update_handler::<R, P>)
                .patch(patch_handler::<R, P>)
                .delete(delete_handler::<R, P>),
        )
        .route("/api/v1/dashboard/stats", get(stats_handler::<R, P>))
        .with_state(service)
}

fn error_response(error: AssessmentServiceError) -> Response {
    match error {
        AssessmentServiceError::Validation(error) => error.into_response(),
        AssessmentServiceError::NotFound(_)
        | AssessmentServiceError::Repository(RepositoryError::NotFound) => not_found("assessment"),
        other => internal_error(&other),
    }
}

pub(crate) async fn list_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.list(&owner) {
        Ok(assessments) => {
            let views: Vec<_> = assessments.iter().map(|item| item.summary_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
    payload: Result<Json<AssessmentInput>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.create(&owner, input) {
        Ok(assessment) => (StatusCode::CREATED, Json(assessment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bulk_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
    payload: Result<Json<BulkAssessmentRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.bulk_create(&owner, request.processes) {
        Ok(created) => {
            let views: Vec<_> = created.iter().map(|item| item.summary_view()).collect();
            let payload = json!({
                "message": format!("Successfully created {} assessments", views.len()),
                "processes": views,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.get(&owner, AssessmentId(assessment_id)) {
        Ok(assessment) => (StatusCode::OK, Json(assessment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
    Path(assessment_id): Path<u64>,
    payload: Result<Json<AssessmentInput>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.update(&owner, AssessmentId(assessment_id), input) {
        Ok(assessment) => (StatusCode::OK, Json(assessment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn patch_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
    Path(assessment_id): Path<u64>,
    payload: Result<Json<AssessmentInput>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.patch(&owner, AssessmentId(assessment_id), patch) {
        Ok(assessment) => (StatusCode::OK, Json(assessment.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.delete(&owner, AssessmentId(assessment_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    headers: HeaderMap,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.dashboard_stats(&owner) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}
