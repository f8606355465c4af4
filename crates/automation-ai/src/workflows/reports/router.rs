use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ReportId, ReportInput};
use super::export::ExportFormat;
use super::repository::ReportRepository;
use super::service::{ReportService, ReportServiceError};
use crate::identity::acting_user;
use crate::workflows::assessments::{AssessmentRepository, RepositoryError};
use crate::workflows::responses::{bad_json, internal_error, not_found};

pub fn report_router<P, R>(service: Arc<ReportService<P, R>>) -> Router
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports",
            get(list_handler::<P, R>).post(create_handler::<P, R>),
        )
        .route(
            "/api/v1/reports/:report_id",
            get(detail_handler::<P, R>)
                .put(update_handler::<P, R>)
                .delete(delete_handler::<P, R>),
        )
        .route(
            "/api/v1/reports/:report_id/conclusion",
            post(conclusion_handler::<P, R>),
        )
        .route(
            "/api/v1/reports/:report_id/export/csv",
            get(csv_handler::<P, R>),
        )
        .route(
            "/api/v1/reports/:report_id/export/pdf",
            get(pdf_handler::<P, R>),
        )
        .with_state(service)
}

fn error_response(error: ReportServiceError) -> Response {
    match error {
        ReportServiceError::Validation(error) => error.into_response(),
        ReportServiceError::NotFound(_)
        | ReportServiceError::Repository(RepositoryError::NotFound) => not_found("report"),
        other => internal_error(&other),
    }
}

fn report_response<P, R>(
    service: &ReportService<P, R>,
    status: StatusCode,
    report: &super::domain::Report,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    match service.members(report) {
        Ok(members) => (status, Json(report.view(&members))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let reports = match service.list(&owner) {
        Ok(reports) => reports,
        Err(error) => return error_response(error),
    };
    let mut views = Vec::with_capacity(reports.len());
    for report in &reports {
        match service.members(report) {
            Ok(members) => views.push(report.view(&members)),
            Err(error) => return error_response(error),
        }
    }
    (StatusCode::OK, Json(views)).into_response()
}

pub(crate) async fn create_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    payload: Result<Json<ReportInput>, JsonRejection>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
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
        Ok(report) => report_response(&service, StatusCode::CREATED, &report),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    Path(report_id): Path<u64>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.get(&owner, ReportId(report_id)) {
        Ok(report) => report_response(&service, StatusCode::OK, &report),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    Path(report_id): Path<u64>,
    payload: Result<Json<ReportInput>, JsonRejection>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.update(&owner, ReportId(report_id), input) {
        Ok(report) => report_response(&service, StatusCode::OK, &report),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    Path(report_id): Path<u64>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.delete(&owner, ReportId(report_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn conclusion_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    Path(report_id): Path<u64>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.generate_conclusion(&owner, ReportId(report_id)) {
        Ok(conclusion) => {
            (StatusCode::OK, Json(json!({ "ai_conclusion": conclusion }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn csv_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    Path(report_id): Path<u64>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    export_response(&service, &headers, ReportId(report_id), ExportFormat::Csv)
}

pub(crate) async fn pdf_handler<P, R>(
    State(service): State<Arc<ReportService<P, R>>>,
    headers: HeaderMap,
    Path(report_id): Path<u64>,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    export_response(&service, &headers, ReportId(report_id), ExportFormat::Pdf)
}

fn export_response<P, R>(
    service: &ReportService<P, R>,
    headers: &HeaderMap,
    id: ReportId,
    format: ExportFormat,
) -> Response
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    let owner = match acting_user(headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.export(&owner, id, format) {
        Ok(file) => {
            let disposition = format!("attachment; filename=\"{}\"", file.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, file.format.mime().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                file.bytes,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}
