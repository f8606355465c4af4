use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::AutomationPlanRequest;
use super::repository::{RecommendationRepository, TemplateRepository};
use super::service::{AutomationService, AutomationServiceError};
use crate::identity::acting_user;
use crate::workflows::responses::{bad_json, internal_error};

pub fn automation_router<T, S>(service: Arc<AutomationService<T, S>>) -> Router
where
    T: TemplateRepository + 'static,
    S: RecommendationRepository + 'static,
{
    Router::new()
        .route("/api/v1/automation/templates", get(templates_handler::<T, S>))
        .route(
            "/api/v1/automation/recommendations",
            get(list_handler::<T, S>).post(generate_handler::<T, S>),
        )
        .with_state(service)
}

fn error_response(error: AutomationServiceError) -> Response {
    match error {
        AutomationServiceError::Validation(error) => error.into_response(),
        other => internal_error(&other),
    }
}

pub(crate) async fn templates_handler<T, S>(
    State(service): State<Arc<AutomationService<T, S>>>,
    headers: HeaderMap,
) -> Response
where
    T: TemplateRepository + 'static,
    S: RecommendationRepository + 'static,
{
    if let Err(rejection) = acting_user(&headers) {
        return rejection.into_response();
    }
    match service.templates() {
        Ok(templates) => {
            let views: Vec<_> = templates.iter().map(|template| template.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn generate_handler<T, S>(
    State(service): State<Arc<AutomationService<T, S>>>,
    headers: HeaderMap,
    payload: Result<Json<AutomationPlanRequest>, JsonRejection>,
) -> Response
where
    T: TemplateRepository + 'static,
    S: RecommendationRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.generate(&owner, request) {
        Ok(recommendation) => (StatusCode::OK, Json(recommendation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<T, S>(
    State(service): State<Arc<AutomationService<T, S>>>,
    headers: HeaderMap,
) -> Response
where
    T: TemplateRepository + 'static,
    S: RecommendationRepository + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.recommendations(&owner) {
        Ok(recommendations) => (StatusCode::OK, Json(recommendations)).into_response(),
        Err(error) => error_response(error),
    }
}
