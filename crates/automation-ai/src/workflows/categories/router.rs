use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::CategoryInput;
use super::repository::CategoryRepository;
use super::service::{CategoryService, CategoryServiceError};
use crate::identity::acting_user;
use crate::workflows::responses::{bad_json, internal_error};

pub fn category_router<S>(service: Arc<CategoryService<S>>) -> Router
where
    S: CategoryRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/categories",
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .with_state(service)
}

fn error_response(error: CategoryServiceError) -> Response {
    match error {
        CategoryServiceError::Validation(error) => error.into_response(),
        other => internal_error(&other),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<CategoryService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: CategoryRepository + 'static,
{
    if let Err(rejection) = acting_user(&headers) {
        return rejection.into_response();
    }
    match service.list() {
        Ok(categories) => {
            let views: Vec<_> = categories.iter().map(|category| category.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<CategoryService<S>>>,
    headers: HeaderMap,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Response
where
    S: CategoryRepository + 'static,
{
    if let Err(rejection) = acting_user(&headers) {
        return rejection.into_response();
    }
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.create(input) {
        Ok(category) => (StatusCode::CREATED, Json(category.view())).into_response(),
        Err(error) => error_response(error),
    }
}
